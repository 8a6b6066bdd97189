//! chunkshed-reconcile - Chunked watershed with boundary reconciliation
//!
//! This crate runs a marker-driven watershed over a domain split into
//! overlapping chunks, then repairs the label disagreements that appear
//! where basins cross chunk faces. Two strategies are available:
//!
//! - [`Strategy::DirectSharing`] - Neighbors' first-pass labels become
//!   extra seeds on the halo ring of a second flood
//! - [`Strategy::SentinelBasinSharing`] - A sentinel basin marks the cells
//!   a chunk cannot decide alone, and only those are flooded again
//!
//! Per-chunk work is dispatched through [`Execution`]; the result never
//! depends on the order chunks are processed in.
//!
//! # Examples
//!
//! ```
//! use chunkshed_reconcile::{BoundaryReconciler, Execution, ReconcileConfig};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let elevation = ArrayD::from_shape_fn(IxDyn(&[8, 8]), |idx| idx[1] as f32);
//! let mut markers = ArrayD::<u32>::zeros(IxDyn(&[8, 8]));
//! markers[IxDyn(&[0, 0])] = 1;
//!
//! let config = ReconcileConfig::new(&[4, 4]).with_execution(Execution::Sequential);
//! let out = BoundaryReconciler::new(config).segment(&elevation, &markers).unwrap();
//! assert_eq!(out.report.chunks, 4);
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod report;

mod direct;
mod pass;
mod sentinel;

pub use config::{ReconcileConfig, Strategy};
pub use dispatch::Execution;
pub use error::{ReconcileError, ReconcileResult};
pub use pipeline::{BoundaryReconciler, Segmentation, segment_chunked};
pub use report::{RunReport, seam_disagreements};
