//! ChunkedArray - a domain array split into per-chunk blocks
//!
//! A [`ChunkedArray`] owns one block per chunk of a [`GridGeometry`], in
//! row-major chunk order. Every block covers its chunk's core plus a
//! uniform halo of `halo` cells on every side (`halo == 0` for plain core
//! blocks).

use crate::border::remove_border;
use crate::error::{Error, Result, ensure_same_shape};
use crate::geometry::GridGeometry;
use ndarray::{ArrayD, IxDyn, Slice};

/// An array partitioned into chunk blocks
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkedArray<T> {
    geometry: GridGeometry,
    halo: usize,
    blocks: Vec<ArrayD<T>>,
}

impl<T: Clone> ChunkedArray<T> {
    /// Split a domain array into core blocks
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the array shape is not the
    /// geometry's domain shape.
    pub fn split(array: &ArrayD<T>, geometry: &GridGeometry) -> Result<Self> {
        ensure_same_shape(geometry.domain_shape(), array.shape())?;
        let blocks = (0..geometry.num_chunks())
            .map(|chunk| -> Result<ArrayD<T>> {
                Ok(geometry.core_box(chunk)?.view(array)?.to_owned())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ChunkedArray {
            geometry: geometry.clone(),
            halo: 0,
            blocks,
        })
    }

    /// Build from blocks that already carry a halo of `halo` cells
    ///
    /// # Errors
    ///
    /// Returns an error if the block count does not match the geometry or
    /// any block's shape is not its core shape grown by `2 * halo`.
    pub fn from_blocks(
        geometry: &GridGeometry,
        halo: usize,
        blocks: Vec<ArrayD<T>>,
    ) -> Result<Self> {
        if blocks.len() != geometry.num_chunks() {
            return Err(Error::InvalidParameter(format!(
                "expected {} blocks, got {}",
                geometry.num_chunks(),
                blocks.len()
            )));
        }
        for (chunk, block) in blocks.iter().enumerate() {
            let expected: Vec<usize> = geometry
                .core_box(chunk)?
                .shape()
                .iter()
                .map(|&s| s + 2 * halo)
                .collect();
            ensure_same_shape(&expected, block.shape())?;
        }
        Ok(ChunkedArray {
            geometry: geometry.clone(),
            halo,
            blocks,
        })
    }

    /// Geometry the blocks follow
    #[inline]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Halo depth carried by every block
    #[inline]
    pub fn halo(&self) -> usize {
        self.halo
    }

    /// Number of blocks
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if there are no blocks
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks in chunk order
    #[inline]
    pub fn blocks(&self) -> &[ArrayD<T>] {
        &self.blocks
    }

    /// Block of one chunk
    pub fn block(&self, chunk: usize) -> Result<&ArrayD<T>> {
        self.blocks.get(chunk).ok_or(Error::IndexOutOfBounds {
            index: chunk,
            len: self.blocks.len(),
        })
    }

    /// Consume and return the blocks
    pub fn into_blocks(self) -> Vec<ArrayD<T>> {
        self.blocks
    }

    /// Apply `f` to every block, keeping the halo depth
    ///
    /// # Errors
    ///
    /// Returns an error if `f` changes a block's shape.
    pub fn map_blocks<U: Clone, F>(&self, f: F) -> Result<ChunkedArray<U>>
    where
        F: Fn(&ArrayD<T>) -> ArrayD<U>,
    {
        let blocks = self.blocks.iter().map(f).collect();
        ChunkedArray::from_blocks(&self.geometry, self.halo, blocks)
    }

    /// Strip the halo from every block
    pub fn trim(&self) -> Result<ChunkedArray<T>> {
        let blocks = self
            .blocks
            .iter()
            .map(|block| remove_border(block, self.halo))
            .collect::<Result<Vec<_>>>()?;
        Ok(ChunkedArray {
            geometry: self.geometry.clone(),
            halo: 0,
            blocks,
        })
    }
}

impl<T: Clone + Default> ChunkedArray<T> {
    /// Reassemble the global array from the core of every block
    pub fn assemble(&self) -> Result<ArrayD<T>> {
        let mut out = ArrayD::from_elem(IxDyn(self.geometry.domain_shape()), T::default());
        let halo = self.halo;
        for (chunk, block) in self.blocks.iter().enumerate() {
            let core = self.geometry.core_box(chunk)?;
            let src = block.slice_each_axis(|ax| Slice::from(halo..ax.len - halo));
            core.view_mut(&mut out)?.assign(&src);
        }
        Ok(out)
    }
}
