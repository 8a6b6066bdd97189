//! Composition of segmentation passes
//!
//! Merges the results of two passes cell by cell and strips halos back off
//! padded blocks.

use crate::border::remove_border;
use crate::error::{Result, ensure_same_shape};
use ndarray::{ArrayD, Zip};

/// Select `second` where `mask` is true and `first` elsewhere
///
/// # Errors
///
/// Returns [`crate::Error::ShapeMismatch`] unless all three arrays have
/// the same shape.
pub fn compose<T: Clone>(
    first: &ArrayD<T>,
    second: &ArrayD<T>,
    mask: &ArrayD<bool>,
) -> Result<ArrayD<T>> {
    ensure_same_shape(first.shape(), second.shape())?;
    ensure_same_shape(first.shape(), mask.shape())?;
    Ok(Zip::from(first)
        .and(second)
        .and(mask)
        .map_collect(|a, b, &m| if m { b.clone() } else { a.clone() }))
}

/// Strip a halo of `depth` cells from every side
///
/// Inverse of halo padding with the same depth.
pub fn trim<T: Clone>(array: &ArrayD<T>, depth: usize) -> Result<ArrayD<T>> {
    remove_border(array, depth)
}
