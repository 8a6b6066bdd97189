//! Run summary

use std::fmt;

use chunkshed_core::{GridGeometry, LabelMap, Side, ensure_same_shape};
use ndarray::Zip;

use crate::config::Strategy;
use crate::error::ReconcileResult;

/// Summary of one segmentation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Strategy the run used
    pub strategy: Strategy,
    /// Number of chunks
    pub chunks: usize,
    /// Chunks without any seed in the first pass
    pub first_pass_empty: usize,
    /// Chunks without any seed in the second pass
    pub second_pass_empty: usize,
    /// Cells whose first-pass label differs from the final one
    pub relabeled_cells: usize,
    /// Face-adjacent cell pairs across chunk faces with different nonzero
    /// labels in the final result
    pub seam_disagreements: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} over {} chunks: empty {}/{}, relabeled {}, seam disagreements {}",
            self.strategy,
            self.chunks,
            self.first_pass_empty,
            self.second_pass_empty,
            self.relabeled_cells,
            self.seam_disagreements
        )
    }
}

/// Count face-adjacent cell pairs that straddle a chunk face and carry
/// different nonzero labels
///
/// Each interior face is visited once, from the chunk on its lower side.
///
/// # Errors
///
/// Returns a core `ShapeMismatch` if `labels` does not cover the
/// geometry's domain.
pub fn seam_disagreements(labels: &LabelMap, geometry: &GridGeometry) -> ReconcileResult<usize> {
    ensure_same_shape(geometry.domain_shape(), labels.shape())?;
    let mut count = 0;
    for chunk in 0..geometry.num_chunks() {
        for face in geometry.faces(chunk, 1)? {
            let outer = match (&face.side, &face.outer) {
                (Side::Upper, Some(outer)) => outer,
                _ => continue,
            };
            let inside = face.inner.view(labels)?;
            let across = outer.view(labels)?;
            count += Zip::from(&inside).and(&across).fold(0usize, |acc, &a, &b| {
                acc + usize::from(a != 0 && b != 0 && a != b)
            });
        }
    }
    Ok(count)
}
