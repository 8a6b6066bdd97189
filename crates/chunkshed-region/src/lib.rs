//! chunkshed-region - Watershed segmentation of a single block
//!
//! This crate provides the sequential segmentation primitive that the
//! chunked pipeline runs on every chunk:
//!
//! - **Priority-flood watershed** - Growing seeded basins over a cost surface
//! - **Connectivity** - Face or full neighborhoods in any dimension
//! - **Label analysis** - Counting, bounding and comparing basin labels
//!
//! # Examples
//!
//! ```
//! use chunkshed_region::{Connectivity, WatershedOptions, flood, label_counts};
//! use ndarray::{ArrayD, IxDyn};
//!
//! // Two valleys separated by a ridge in the middle column
//! let elevation = ArrayD::from_shape_fn(IxDyn(&[3, 5]), |idx| {
//!     (2 - (idx[1] as i32 - 2).abs()) as f32
//! });
//! let mut markers = ArrayD::<u32>::zeros(IxDyn(&[3, 5]));
//! markers[IxDyn(&[1, 0])] = 1;
//! markers[IxDyn(&[1, 4])] = 2;
//!
//! let options = WatershedOptions::new().with_connectivity(Connectivity::Face);
//! let labels = flood(&elevation, &markers, None, &options).unwrap();
//! let counts = label_counts(&labels);
//! assert_eq!(counts.values().sum::<usize>(), 15);
//! ```

pub mod connectivity;
pub mod error;
pub mod label;
pub mod watershed;

pub use connectivity::Connectivity;
pub use error::{RegionError, RegionResult};
pub use label::{count_differences, label_bounds, label_counts, max_label};
pub use watershed::{WatershedOptions, flood, flood_or_zero};
