//! ChunkBox - N-dimensional rectangular regions
//!
//! A `ChunkBox` is an axis-aligned box described by its start corner and
//! its extent along every axis. Coordinates are global (domain) indices
//! unless a box has been made relative to another one.

use crate::error::{Error, Result};
use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Slice};

/// An N-dimensional rectangular region
///
/// One `(start, extent)` pair per axis instead of a fixed `(x, y, w, h)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ChunkBox {
    start: Vec<usize>,
    shape: Vec<usize>,
}

impl ChunkBox {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if `start` and `shape` have different lengths.
    pub fn new(start: Vec<usize>, shape: Vec<usize>) -> Result<Self> {
        if start.len() != shape.len() {
            return Err(Error::InvalidParameter(format!(
                "box start has {} axes but shape has {}",
                start.len(),
                shape.len()
            )));
        }
        Ok(Self { start, shape })
    }

    /// Create a box covering a whole array of the given shape
    pub fn from_shape(shape: &[usize]) -> Self {
        Self {
            start: vec![0; shape.len()],
            shape: shape.to_vec(),
        }
    }

    /// Number of axes
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Start corner (inclusive)
    #[inline]
    pub fn start(&self) -> &[usize] {
        &self.start
    }

    /// Extent along every axis
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// End coordinate along `axis` (exclusive)
    #[inline]
    pub fn end(&self, axis: usize) -> usize {
        self.start[axis] + self.shape[axis]
    }

    /// Number of cells in the box
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Check if the box is empty (zero extent along some axis)
    pub fn is_empty(&self) -> bool {
        self.shape.iter().any(|&s| s == 0)
    }

    /// Check if a point is inside the box
    pub fn contains(&self, point: &[usize]) -> bool {
        point.len() == self.ndim()
            && point
                .iter()
                .enumerate()
                .all(|(axis, &p)| p >= self.start[axis] && p < self.end(axis))
    }

    /// Check if this box contains another box
    pub fn contains_box(&self, other: &ChunkBox) -> bool {
        other.ndim() == self.ndim()
            && (0..self.ndim()).all(|axis| {
                other.start[axis] >= self.start[axis] && other.end(axis) <= self.end(axis)
            })
    }

    /// Intersection of two boxes, or `None` if they do not overlap
    pub fn intersect(&self, other: &ChunkBox) -> Option<ChunkBox> {
        if other.ndim() != self.ndim() {
            return None;
        }
        let mut start = Vec::with_capacity(self.ndim());
        let mut shape = Vec::with_capacity(self.ndim());
        for axis in 0..self.ndim() {
            let lo = self.start[axis].max(other.start[axis]);
            let hi = self.end(axis).min(other.end(axis));
            if lo >= hi {
                return None;
            }
            start.push(lo);
            shape.push(hi - lo);
        }
        Some(ChunkBox { start, shape })
    }

    /// Grow the box by `depth` on every side, clipped to `[0, limits)`
    pub fn expand_clipped(&self, depth: usize, limits: &[usize]) -> ChunkBox {
        let mut start = Vec::with_capacity(self.ndim());
        let mut shape = Vec::with_capacity(self.ndim());
        for axis in 0..self.ndim() {
            let lo = self.start[axis].saturating_sub(depth);
            let hi = (self.end(axis) + depth).min(limits[axis]);
            start.push(lo);
            shape.push(hi - lo);
        }
        ChunkBox { start, shape }
    }

    /// Express this box in the coordinates of `origin`'s start corner
    ///
    /// # Errors
    ///
    /// Returns an error if this box is not contained in `origin`.
    pub fn relative_to(&self, origin: &ChunkBox) -> Result<ChunkBox> {
        if !origin.contains_box(self) {
            return Err(Error::InvalidParameter(format!(
                "box {:?} is not inside {:?}",
                self, origin
            )));
        }
        let start = self
            .start
            .iter()
            .zip(&origin.start)
            .map(|(&s, &o)| s - o)
            .collect();
        Ok(ChunkBox {
            start,
            shape: self.shape.clone(),
        })
    }

    /// Shift the box by `offset` along every axis
    pub fn translate(&self, offset: &[usize]) -> ChunkBox {
        let start = self
            .start
            .iter()
            .zip(offset)
            .map(|(&s, &o)| s + o)
            .collect();
        ChunkBox {
            start,
            shape: self.shape.clone(),
        }
    }

    fn check_fits(&self, array_shape: &[usize]) -> Result<()> {
        let fits = array_shape.len() == self.ndim()
            && (0..self.ndim()).all(|axis| self.end(axis) <= array_shape[axis]);
        if !fits {
            return Err(Error::InvalidParameter(format!(
                "box {:?} does not fit array of shape {:?}",
                self, array_shape
            )));
        }
        Ok(())
    }

    /// View the boxed region of an array
    pub fn view<'a, T>(&self, array: &'a ArrayD<T>) -> Result<ArrayViewD<'a, T>> {
        self.check_fits(array.shape())?;
        Ok(array.slice_each_axis(|ax| {
            let axis = ax.axis.index();
            Slice::from(self.start[axis]..self.end(axis))
        }))
    }

    /// Mutably view the boxed region of an array
    pub fn view_mut<'a, T>(&self, array: &'a mut ArrayD<T>) -> Result<ArrayViewMutD<'a, T>> {
        self.check_fits(array.shape())?;
        Ok(array.slice_each_axis_mut(|ax| {
            let axis = ax.axis.index();
            Slice::from(self.start[axis]..self.end(axis))
        }))
    }
}
