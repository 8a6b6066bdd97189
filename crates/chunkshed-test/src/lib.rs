//! chunkshed-test - Regression test framework for chunkshed
//!
//! This crate provides a small regression harness (see [`RegParams`])
//! together with deterministic
//! synthetic fixtures: cost surfaces and marker images that the chunked
//! segmentation tests run on.
//!
//! # Usage
//!
//! ```ignore
//! use chunkshed_test::{RegParams, ramp};
//!
//! let mut rp = RegParams::new("halo");
//! rp.compare_values(16.0, ramp(&[4, 4], 1).len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "display" to print every compared array

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use ndarray::{ArrayD, Dimension, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Surface rising by one per step along `axis`
///
/// Every cell's value is its coordinate on `axis`.
pub fn ramp(shape: &[usize], axis: usize) -> ArrayD<f32> {
    ArrayD::from_shape_fn(IxDyn(shape), |idx| idx[axis] as f32)
}

/// Smooth 2D surface of superimposed sines and cosines
///
/// A wavy landscape with many local minima. `variant` selects one of two
/// phase patterns.
pub fn sine_surface(height: usize, width: usize, variant: u32) -> ArrayD<f32> {
    ArrayD::from_shape_fn(IxDyn(&[height, width]), |idx| {
        let fi = idx[0] as f32;
        let fj = idx[1] as f32;
        if variant == 0 {
            128.0
                + 26.3 * (0.0438 * fi).sin()
                + 33.4 * (0.0712 * fi).cos()
                + 18.6 * (0.0561 * fj).sin()
                + 23.6 * (0.0327 * fj).cos()
        } else {
            128.0
                + 26.3 * (0.0238 * fi).sin()
                + 33.4 * (0.0312 * fi).cos()
                + 18.6 * (0.0261 * fj).sin()
                + 23.6 * (0.0207 * fj).cos()
        }
    })
}

/// Uniform random surface in `[0, 1)`, reproducible from `seed`
pub fn random_surface(shape: &[usize], seed: u64) -> ArrayD<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_fn(IxDyn(shape), |_| rng.random::<f32>())
}

/// Marker image with the given `(position, label)` seeds and zeros elsewhere
///
/// # Errors
///
/// Returns [`TestError::MarkerOutOfBounds`] for a position outside `shape`,
/// and [`TestError::InvalidFixture`] for a zero label.
pub fn markers(shape: &[usize], seeds: &[(&[usize], u32)]) -> TestResult<ArrayD<u32>> {
    let mut out = ArrayD::zeros(IxDyn(shape));
    for &(point, label) in seeds {
        if label == 0 {
            return Err(TestError::InvalidFixture {
                name: "markers",
                message: format!("seed at {:?} has label 0", point),
            });
        }
        let inside = point.len() == shape.len() && point.iter().zip(shape).all(|(&p, &s)| p < s);
        if !inside {
            return Err(TestError::MarkerOutOfBounds {
                point: point.to_vec(),
                shape: shape.to_vec(),
            });
        }
        out[IxDyn(point)] = label;
    }
    Ok(out)
}

/// Seed every strict local minimum of `surface` (face neighbors only) with
/// its own label, numbered from 1 in row-major order
pub fn minima_markers(surface: &ArrayD<f32>) -> ArrayD<u32> {
    let shape = surface.shape().to_vec();
    let mut out = ArrayD::zeros(IxDyn(&shape));
    let mut next = 1u32;
    for (idx, &value) in surface.indexed_iter() {
        let mut is_min = true;
        let mut probe = idx.clone();
        'axes: for axis in 0..shape.len() {
            for step in [-1isize, 1] {
                let p = idx[axis] as isize + step;
                if p < 0 || p >= shape[axis] as isize {
                    continue;
                }
                probe[axis] = p as usize;
                let other = surface[probe.slice()];
                probe[axis] = idx[axis];
                if other <= value {
                    is_min = false;
                    break 'axes;
                }
            }
        }
        if is_min {
            out[idx.slice()] = next;
            next += 1;
        }
    }
    out
}
