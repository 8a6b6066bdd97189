//! Border operations for arrays
//!
//! This module provides functions for adding and removing a uniform
//! border (halo ring) of `depth` cells around an N-dimensional array:
//!
//! - Constant borders, used to seed a halo with a fixed value
//! - Border removal, the inverse of any uniform padding
//! - Ring masks, marking which cells of a padded array are border

use crate::error::{Error, Result};
use ndarray::{ArrayD, IxDyn, Slice};

/// Add a uniform border around an array.
///
/// Creates a new array with `depth` cells of border on both sides of every
/// axis, filled with `value`.
///
/// # Returns
///
/// New array with every extent grown by `2 * depth`.
pub fn add_border<T: Clone>(array: &ArrayD<T>, depth: usize, value: T) -> ArrayD<T> {
    let shape: Vec<usize> = array.shape().iter().map(|&s| s + 2 * depth).collect();
    let mut out = ArrayD::from_elem(IxDyn(&shape), value);
    out.slice_each_axis_mut(|ax| Slice::from(depth..ax.len - depth))
        .assign(array);
    out
}

/// Remove a uniform border from an array.
///
/// # Returns
///
/// New array with every extent shrunk by `2 * depth`.
///
/// # Errors
///
/// Returns error if the border is larger than the array along some axis.
pub fn remove_border<T: Clone>(array: &ArrayD<T>, depth: usize) -> Result<ArrayD<T>> {
    if let Some(axis) = array.shape().iter().position(|&s| s < 2 * depth) {
        return Err(Error::InvalidParameter(format!(
            "border depth {} too large for extent {} on axis {}",
            depth,
            array.shape()[axis],
            axis
        )));
    }
    Ok(array
        .slice_each_axis(|ax| Slice::from(depth..ax.len - depth))
        .to_owned())
}

/// Mask of the border ring of an array of `shape`: `true` within `depth`
/// cells of any face, `false` in the interior.
pub fn border_ring(shape: &[usize], depth: usize) -> ArrayD<bool> {
    let mut ring = ArrayD::from_elem(IxDyn(shape), true);
    if shape.iter().all(|&s| s > 2 * depth) {
        ring.slice_each_axis_mut(|ax| Slice::from(depth..ax.len - depth))
            .fill(false);
    }
    ring
}
