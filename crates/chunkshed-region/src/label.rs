//! Label map analysis
//!
//! Small utilities for inspecting the output of a watershed run: basin
//! counts, sizes, extents, and comparisons between two runs.

use std::collections::BTreeMap;

use chunkshed_core::{ChunkBox, Label, LabelMap, ensure_same_shape};
use ndarray::Dimension;

use crate::error::RegionResult;

/// Largest label present, or 0 for an unlabeled (or empty) map
pub fn max_label(labels: &LabelMap) -> Label {
    labels.iter().copied().max().unwrap_or(0)
}

/// Number of cells carrying each nonzero label
///
/// # Returns
///
/// A map from label to cell count, ordered by label. Unlabeled cells are
/// not counted.
pub fn label_counts(labels: &LabelMap) -> BTreeMap<Label, usize> {
    let mut counts = BTreeMap::new();
    for &label in labels.iter().filter(|&&l| l != 0) {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// Bounding box of every nonzero label
pub fn label_bounds(labels: &LabelMap) -> BTreeMap<Label, ChunkBox> {
    let mut extents: BTreeMap<Label, (Vec<usize>, Vec<usize>)> = BTreeMap::new();
    for (idx, &label) in labels.indexed_iter() {
        if label == 0 {
            continue;
        }
        let point = idx.slice();
        let (lo, hi) = extents
            .entry(label)
            .or_insert_with(|| (point.to_vec(), point.to_vec()));
        for (axis, &p) in point.iter().enumerate() {
            lo[axis] = lo[axis].min(p);
            hi[axis] = hi[axis].max(p);
        }
    }

    extents
        .into_iter()
        .filter_map(|(label, (lo, hi))| {
            let shape = lo.iter().zip(&hi).map(|(&l, &h)| h - l + 1).collect();
            ChunkBox::new(lo, shape).ok().map(|b| (label, b))
        })
        .collect()
}

/// Number of cells where two label maps disagree
///
/// # Errors
///
/// Returns a core `ShapeMismatch` if the maps differ in shape.
pub fn count_differences(a: &LabelMap, b: &LabelMap) -> RegionResult<usize> {
    ensure_same_shape(a.shape(), b.shape())?;
    Ok(a.iter().zip(b.iter()).filter(|(x, y)| x != y).count())
}
