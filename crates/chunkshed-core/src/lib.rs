//! chunkshed-core - Chunk geometry and halo plumbing for chunked watershed
//!
//! This crate provides the data-independent building blocks used to run a
//! segmentation over a domain split into overlapping chunks:
//!
//! - [`GridGeometry`] / [`ChunkBox`] - Partitioning a domain into chunks
//! - [`ChunkedArray`] - Per-chunk blocks of a domain array
//! - [`exchange`] / [`BoundaryPolicy`] - Halo exchange between chunks
//! - [`compose`] / [`trim`] - Merging passes and stripping halos
//!
//! # Examples
//!
//! ```
//! use chunkshed_core::{BoundaryPolicy, ChunkLayout, ChunkedArray, GridGeometry, exchange};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let data = ArrayD::from_shape_vec(IxDyn(&[4, 4]), (0u32..16).collect()).unwrap();
//! let geometry = GridGeometry::new(&[4, 4], &[4, 2], 1, ChunkLayout::Exact).unwrap();
//!
//! let chunks = ChunkedArray::split(&data, &geometry).unwrap();
//! let padded = exchange(&chunks, 1, &BoundaryPolicy::Nearest).unwrap();
//! assert_eq!(padded.block(0).unwrap().shape(), &[6, 4]);
//!
//! // Trimming the halo gives back the original blocks.
//! assert_eq!(padded.trim().unwrap(), chunks);
//! ```

pub mod border;
pub mod bounds;
pub mod chunked;
pub mod compose;
pub mod error;
pub mod geometry;
pub mod halo;

use ndarray::ArrayD;

pub use border::{add_border, border_ring, remove_border};
pub use bounds::ChunkBox;
pub use chunked::ChunkedArray;
pub use compose::{compose, trim};
pub use error::{Error, Result, ensure_same_shape};
pub use geometry::{ChunkLayout, Face, GridGeometry, Neighbor, Side, directions};
pub use halo::{BoundaryPolicy, exchange};

/// Scalar elevation of the cost surface
pub type Elevation = f32;

/// Basin label; `0` means unlabeled
pub type Label = u32;

/// Cost surface over (a chunk of) the domain
pub type ElevationMap = ArrayD<Elevation>;

/// Seed markers; `0` is no seed
pub type MarkerMap = ArrayD<Label>;

/// Result of a watershed run
pub type LabelMap = ArrayD<Label>;

/// Cells still to be resolved by a second pass
pub type BoundaryMask = ArrayD<bool>;
