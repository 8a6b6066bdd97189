//! Marker-driven watershed segmentation
//!
//! This module provides the priority-flood watershed applied to a single
//! block. The block is treated as a topographic surface: basins grow out of
//! the seeded marker cells in order of increasing elevation, and every cell
//! ends up in the basin that reached it first.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chunkshed_core::{BoundaryMask, ElevationMap, LabelMap, MarkerMap, ensure_same_shape};
use ndarray::{ArrayD, IxDyn};
use ordered_float::OrderedFloat;

use crate::connectivity::Connectivity;
use crate::error::{RegionError, RegionResult};

/// Options for watershed segmentation
#[derive(Debug, Clone, Default)]
pub struct WatershedOptions {
    /// Connectivity used to find neighbors
    pub connectivity: Connectivity,
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Queue entry: elevation, then insertion order, then linear cell index
type Entry = Reverse<(OrderedFloat<f32>, u64, usize)>;

/// Flood `elevation` from the nonzero cells of `markers`
///
/// Every nonzero marker is a seed, queued in row-major order. The lowest
/// queued cell is popped repeatedly; each unlabeled neighbor takes its label
/// and is queued at its own elevation. Equal elevations pop in insertion
/// order, and neighbors are visited in the fixed order of
/// [`Connectivity::offsets`], so the result is fully deterministic.
///
/// When `mask` is given only mask-true cells can be labeled; mask-false
/// cells keep their marker value (seeds there still spread into the mask).
/// A labeled cell is never relabeled, and cells no basin reaches stay 0.
///
/// # Errors
///
/// Returns [`RegionError::EmptyMarkers`] if no marker is nonzero, and a
/// core `ShapeMismatch` if the markers or mask differ in shape from the
/// elevation.
///
/// # Examples
///
/// ```
/// use chunkshed_region::{WatershedOptions, flood};
/// use ndarray::{ArrayD, IxDyn};
///
/// let elevation = ArrayD::from_shape_vec(IxDyn(&[5]), vec![0.0, 1.0, 2.0, 1.0, 0.0]).unwrap();
/// let markers = ArrayD::from_shape_vec(IxDyn(&[5]), vec![1u32, 0, 0, 0, 2]).unwrap();
///
/// let labels = flood(&elevation, &markers, None, &WatershedOptions::default()).unwrap();
/// assert_eq!(labels.as_slice().unwrap(), &[1, 1, 1, 2, 2]);
/// ```
pub fn flood(
    elevation: &ElevationMap,
    markers: &MarkerMap,
    mask: Option<&BoundaryMask>,
    options: &WatershedOptions,
) -> RegionResult<LabelMap> {
    let shape = elevation.shape().to_vec();
    ensure_same_shape(&shape, markers.shape())?;
    if let Some(mask) = mask {
        ensure_same_shape(&shape, mask.shape())?;
    }

    // Logical row-major copies, whatever the memory layout of the inputs.
    let elev: Vec<f32> = elevation.iter().copied().collect();
    let mut labels: Vec<u32> = markers.iter().copied().collect();
    let allowed: Option<Vec<bool>> = mask.map(|m| m.iter().copied().collect());

    let mut heap: BinaryHeap<Entry> = BinaryHeap::new();
    let mut counter = 0u64;
    for (index, &label) in labels.iter().enumerate() {
        if label != 0 {
            heap.push(Reverse((OrderedFloat(elev[index]), counter, index)));
            counter += 1;
        }
    }
    if heap.is_empty() {
        return Err(RegionError::EmptyMarkers);
    }
    let seeds = counter;

    let ndim = shape.len();
    let mut strides = vec![1usize; ndim];
    for axis in (0..ndim.saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    let offsets = options.connectivity.offsets(ndim);
    let mut coord = vec![0usize; ndim];

    while let Some(Reverse((_, _, index))) = heap.pop() {
        let label = labels[index];
        let mut rest = index;
        for axis in 0..ndim {
            coord[axis] = rest / strides[axis];
            rest %= strides[axis];
        }

        'offsets: for offset in &offsets {
            let mut neighbor = 0usize;
            for axis in 0..ndim {
                let c = coord[axis] as isize + offset[axis];
                if c < 0 || c >= shape[axis] as isize {
                    continue 'offsets;
                }
                neighbor += c as usize * strides[axis];
            }
            if labels[neighbor] != 0 {
                continue;
            }
            if let Some(allowed) = &allowed {
                if !allowed[neighbor] {
                    continue;
                }
            }
            labels[neighbor] = label;
            heap.push(Reverse((OrderedFloat(elev[neighbor]), counter, neighbor)));
            counter += 1;
        }
    }

    log::trace!(
        "flood {:?}: {} seeds, {} cells labeled",
        shape,
        seeds,
        counter - seeds
    );

    ArrayD::from_shape_vec(IxDyn(&shape), labels)
        .map_err(|e| RegionError::InvalidParameters(e.to_string()))
}

/// Like [`flood`], but a block without any seed yields an all-zero label map
/// instead of [`RegionError::EmptyMarkers`]
///
/// Returns the labels and whether the block was empty.
pub fn flood_or_zero(
    elevation: &ElevationMap,
    markers: &MarkerMap,
    mask: Option<&BoundaryMask>,
    options: &WatershedOptions,
) -> RegionResult<(LabelMap, bool)> {
    match flood(elevation, markers, mask, options) {
        Ok(labels) => Ok((labels, false)),
        Err(RegionError::EmptyMarkers) => {
            log::trace!("flood {:?}: no seeds, block left unlabeled", elevation.shape());
            Ok((ArrayD::zeros(elevation.raw_dim()), true))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkshed_core::Error;

    fn arr<T>(shape: &[usize], data: Vec<T>) -> ArrayD<T> {
        ArrayD::from_shape_vec(IxDyn(shape), data).unwrap()
    }

    fn values(labels: &LabelMap) -> Vec<u32> {
        labels.iter().copied().collect()
    }

    #[test]
    fn test_flood_ties_go_to_first_insertion() {
        let elevation = arr(&[7], vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
        let markers = arr(&[7], vec![1u32, 0, 0, 0, 0, 0, 2]);
        let labels = flood(&elevation, &markers, None, &WatershedOptions::new()).unwrap();
        // The crest cell is reached from both sides at the same elevation;
        // the left basin queued its approach first.
        assert_eq!(values(&labels), vec![1, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_flood_ramp_2d() {
        let elevation = ArrayD::from_shape_fn(IxDyn(&[4, 4]), |idx| idx[1] as f32);
        let mut markers = ArrayD::<u32>::zeros(IxDyn(&[4, 4]));
        markers[IxDyn(&[0, 0])] = 1;
        markers[IxDyn(&[3, 3])] = 2;
        let labels = flood(&elevation, &markers, None, &WatershedOptions::new()).unwrap();
        let mut expected = ArrayD::from_elem(IxDyn(&[4, 4]), 1u32);
        expected[IxDyn(&[3, 3])] = 2;
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_flood_respects_mask() {
        let elevation = arr(&[5], vec![0.0f32; 5]);
        let markers = arr(&[5], vec![1u32, 0, 0, 0, 0]);
        let mask = arr(&[5], vec![false, true, true, false, true]);
        let labels = flood(&elevation, &markers, Some(&mask), &WatershedOptions::new()).unwrap();
        assert_eq!(values(&labels), vec![1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_flood_keeps_seed_labels() {
        let elevation = arr(&[4], vec![5.0, 0.0, 0.0, 5.0]);
        let markers = arr(&[4], vec![3u32, 4, 0, 0]);
        let labels = flood(&elevation, &markers, None, &WatershedOptions::new()).unwrap();
        assert_eq!(values(&labels), vec![3, 4, 4, 4]);
    }

    #[test]
    fn test_flood_connectivity() {
        let elevation = ArrayD::<f32>::zeros(IxDyn(&[3, 3]));
        let mut markers = ArrayD::<u32>::zeros(IxDyn(&[3, 3]));
        markers[IxDyn(&[0, 0])] = 1;
        let mut mask = ArrayD::from_elem(IxDyn(&[3, 3]), false);
        mask[IxDyn(&[1, 1])] = true;
        mask[IxDyn(&[2, 2])] = true;

        let face = flood(&elevation, &markers, Some(&mask), &WatershedOptions::new()).unwrap();
        assert_eq!(face[IxDyn(&[1, 1])], 0);
        assert_eq!(face[IxDyn(&[2, 2])], 0);

        let options = WatershedOptions::new().with_connectivity(Connectivity::Full);
        let full = flood(&elevation, &markers, Some(&mask), &options).unwrap();
        assert_eq!(full[IxDyn(&[1, 1])], 1);
        assert_eq!(full[IxDyn(&[2, 2])], 1);
        assert_eq!(full.iter().filter(|&&l| l != 0).count(), 3);
    }

    #[test]
    fn test_flood_3d() {
        let elevation = ArrayD::from_shape_fn(IxDyn(&[2, 3, 4]), |idx| (idx[0] + idx[2]) as f32);
        let mut markers = ArrayD::<u32>::zeros(IxDyn(&[2, 3, 4]));
        markers[IxDyn(&[0, 1, 0])] = 7;
        let labels = flood(&elevation, &markers, None, &WatershedOptions::new()).unwrap();
        assert!(labels.iter().all(|&l| l == 7));
    }

    #[test]
    fn test_flood_empty_markers() {
        let elevation = arr(&[3], vec![0.0f32; 3]);
        let markers = arr(&[3], vec![0u32; 3]);
        let err = flood(&elevation, &markers, None, &WatershedOptions::new()).unwrap_err();
        assert!(matches!(err, RegionError::EmptyMarkers));

        let (labels, empty) =
            flood_or_zero(&elevation, &markers, None, &WatershedOptions::new()).unwrap();
        assert!(empty);
        assert_eq!(values(&labels), vec![0, 0, 0]);
    }

    #[test]
    fn test_flood_shape_mismatch() {
        let elevation = arr(&[3], vec![0.0f32; 3]);
        let markers = arr(&[4], vec![1u32; 4]);
        let err = flood(&elevation, &markers, None, &WatershedOptions::new()).unwrap_err();
        assert!(matches!(err, RegionError::Core(Error::ShapeMismatch { .. })));

        let markers = arr(&[3], vec![1u32; 3]);
        let mask = arr(&[2], vec![true; 2]);
        let err = flood(&elevation, &markers, Some(&mask), &WatershedOptions::new()).unwrap_err();
        assert!(matches!(err, RegionError::Core(Error::ShapeMismatch { .. })));
        let options = WatershedOptions::new();
        assert!(flood_or_zero(&elevation, &markers, Some(&mask), &options).is_err());
    }
}
