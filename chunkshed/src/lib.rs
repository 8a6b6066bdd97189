//! chunkshed - Chunked watershed segmentation for Rust
//!
//! Segments an N-dimensional cost surface that is too large to flood as one
//! array. The domain is split into overlapping chunks, every chunk is
//! flooded on its own, and a second pass reconciles the labels of basins
//! that cross chunk faces, so the reassembled result is globally
//! consistent.
//!
//! # Overview
//!
//! - Chunk geometry, halo exchange and composition (this crate's root)
//! - [`region`] - The single-block priority-flood watershed
//! - [`reconcile`] - The two-pass pipeline and its strategies
//!
//! # Example
//!
//! ```
//! use chunkshed::reconcile::{BoundaryReconciler, ReconcileConfig, Strategy};
//! use chunkshed::region::{WatershedOptions, flood};
//! use ndarray::{ArrayD, IxDyn};
//!
//! // A ramp rising to the right, seeded in two opposite corners
//! let elevation = ArrayD::from_shape_fn(IxDyn(&[4, 4]), |idx| idx[1] as f32);
//! let mut markers = ArrayD::<u32>::zeros(IxDyn(&[4, 4]));
//! markers[IxDyn(&[0, 0])] = 1;
//! markers[IxDyn(&[3, 3])] = 2;
//!
//! let whole = flood(&elevation, &markers, None, &WatershedOptions::new()).unwrap();
//!
//! let config = ReconcileConfig::new(&[4, 2]).with_strategy(Strategy::DirectSharing);
//! let chunked = BoundaryReconciler::new(config).segment(&elevation, &markers).unwrap();
//! assert_eq!(chunked.labels, whole);
//! ```

// Re-export core types (geometry, halo and composition used everywhere)
pub use chunkshed_core::*;

// Re-export the other crates as modules to avoid name conflicts
pub use chunkshed_reconcile as reconcile;
pub use chunkshed_region as region;
