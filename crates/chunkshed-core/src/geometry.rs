//! Grid geometry - partitioning a domain into chunks
//!
//! A [`GridGeometry`] describes how an N-dimensional domain is split into
//! rectangular chunks and how deep the halo around each chunk is. It holds
//! no data; every method is pure coordinate math.
//!
//! Chunks are numbered in row-major order of their grid multi-index, so
//! chunk `0` holds the domain origin and the last axis varies fastest.
//!
//! # Examples
//!
//! ```
//! use chunkshed_core::{ChunkLayout, GridGeometry, Neighbor};
//!
//! let geometry = GridGeometry::new(&[4, 4], &[4, 2], 1, ChunkLayout::Exact).unwrap();
//! assert_eq!(geometry.grid_shape(), &[1, 2]);
//!
//! let faces = geometry.faces(0, 1).unwrap();
//! let right = faces.iter().find(|f| f.axis == 1 && f.outer.is_some()).unwrap();
//! assert_eq!(right.neighbor, Neighbor::Chunk(1));
//! ```

use crate::bounds::ChunkBox;
use crate::error::{Error, Result};

/// How the final chunk along an axis may be sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkLayout {
    /// The chunk shape must divide the domain shape exactly
    #[default]
    Exact,
    /// The last chunk along an axis may be smaller than the others
    Ragged,
}

/// Which side of a chunk a face lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Towards lower coordinates
    Lower,
    /// Towards higher coordinates
    Upper,
}

impl Side {
    /// The face on the other side of the shared boundary
    pub fn opposite(self) -> Side {
        match self {
            Side::Lower => Side::Upper,
            Side::Upper => Side::Lower,
        }
    }

    fn step(self) -> i8 {
        match self {
            Side::Lower => -1,
            Side::Upper => 1,
        }
    }
}

/// What lies across a chunk face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighbor {
    /// Another chunk, by linear index
    Chunk(usize),
    /// The edge of the domain
    DomainEdge,
}

/// One of the 2·N faces of a chunk, with the halo slabs that cross it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// Axis normal to the face
    pub axis: usize,
    /// Side of the chunk the face lies on
    pub side: Side,
    /// Chunk across the face, if any
    pub neighbor: Neighbor,
    /// This chunk's cells visible to the neighbor (global coordinates)
    pub inner: ChunkBox,
    /// The neighbor's cells borrowed by this chunk (global coordinates);
    /// `None` at a domain edge
    pub outer: Option<ChunkBox>,
}

/// Partition of an N-dimensional domain into chunks with a halo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGeometry {
    domain: Vec<usize>,
    chunk_shape: Vec<usize>,
    grid: Vec<usize>,
    halo_depth: usize,
    layout: ChunkLayout,
}

impl GridGeometry {
    /// Create a new geometry
    ///
    /// # Arguments
    ///
    /// * `domain` - Shape of the whole domain
    /// * `chunk_shape` - Nominal shape of every chunk
    /// * `halo_depth` - Halo depth that will be exchanged between chunks
    /// * `layout` - Whether ragged final chunks are allowed
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if the shapes disagree in
    /// dimensionality, contain a zero extent, do not tile the domain under
    /// [`ChunkLayout::Exact`], or if the halo depth exceeds half of the
    /// smallest chunk extent.
    pub fn new(
        domain: &[usize],
        chunk_shape: &[usize],
        halo_depth: usize,
        layout: ChunkLayout,
    ) -> Result<Self> {
        if domain.is_empty() {
            return Err(Error::InvalidGeometry(
                "domain must have at least one axis".to_string(),
            ));
        }
        if domain.len() != chunk_shape.len() {
            return Err(Error::InvalidGeometry(format!(
                "domain has {} axes but chunk shape has {}",
                domain.len(),
                chunk_shape.len()
            )));
        }
        if domain.contains(&0) || chunk_shape.contains(&0) {
            return Err(Error::InvalidGeometry(format!(
                "zero extent in domain {:?} or chunk shape {:?}",
                domain, chunk_shape
            )));
        }

        let mut grid = Vec::with_capacity(domain.len());
        for (axis, (&dom, &chunk)) in domain.iter().zip(chunk_shape).enumerate() {
            if layout == ChunkLayout::Exact && dom % chunk != 0 {
                return Err(Error::InvalidGeometry(format!(
                    "chunk extent {} does not tile domain extent {} on axis {}",
                    chunk, dom, axis
                )));
            }
            grid.push(dom.div_ceil(chunk));
        }

        let geometry = GridGeometry {
            domain: domain.to_vec(),
            chunk_shape: chunk_shape.to_vec(),
            grid,
            halo_depth,
            layout,
        };
        geometry.check_halo_depth(halo_depth)?;
        Ok(geometry)
    }

    /// Shape of the whole domain
    #[inline]
    pub fn domain_shape(&self) -> &[usize] {
        &self.domain
    }

    /// Nominal chunk shape
    #[inline]
    pub fn chunk_shape(&self) -> &[usize] {
        &self.chunk_shape
    }

    /// Number of chunks along every axis
    #[inline]
    pub fn grid_shape(&self) -> &[usize] {
        &self.grid
    }

    /// Configured halo depth
    #[inline]
    pub fn halo_depth(&self) -> usize {
        self.halo_depth
    }

    /// Chunk layout policy
    #[inline]
    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// Number of axes
    #[inline]
    pub fn ndim(&self) -> usize {
        self.domain.len()
    }

    /// Total number of chunks
    pub fn num_chunks(&self) -> usize {
        self.grid.iter().product()
    }

    /// Extent of the chunk at grid position `pos` along `axis`
    fn extent(&self, axis: usize, pos: usize) -> usize {
        let start = pos * self.chunk_shape[axis];
        self.chunk_shape[axis].min(self.domain[axis] - start)
    }

    /// Smallest chunk extent along every axis
    pub fn min_chunk_extent(&self) -> Vec<usize> {
        (0..self.ndim())
            .map(|axis| self.extent(axis, self.grid[axis] - 1))
            .collect()
    }

    /// Check that a halo of `depth` cells only ever reaches the adjacent
    /// chunk along each axis
    ///
    /// A lone chunk has no neighbor to reach, so any depth is accepted: its
    /// whole halo comes from the boundary policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if `depth` exceeds half of the
    /// smallest chunk extent on some axis.
    pub fn check_halo_depth(&self, depth: usize) -> Result<()> {
        if self.num_chunks() == 1 {
            return Ok(());
        }
        for (axis, extent) in self.min_chunk_extent().into_iter().enumerate() {
            if 2 * depth > extent {
                return Err(Error::InvalidGeometry(format!(
                    "halo depth {} exceeds half the smallest chunk extent {} on axis {}",
                    depth, extent, axis
                )));
            }
        }
        Ok(())
    }

    /// Convert a linear chunk index to its grid multi-index
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an unknown chunk.
    pub fn chunk_position(&self, chunk: usize) -> Result<Vec<usize>> {
        let count = self.num_chunks();
        if chunk >= count {
            return Err(Error::IndexOutOfBounds {
                index: chunk,
                len: count,
            });
        }
        let mut pos = vec![0; self.ndim()];
        let mut rest = chunk;
        for axis in (0..self.ndim()).rev() {
            pos[axis] = rest % self.grid[axis];
            rest /= self.grid[axis];
        }
        Ok(pos)
    }

    /// Convert a grid multi-index to a linear chunk index
    pub fn chunk_index(&self, pos: &[usize]) -> Option<usize> {
        if pos.len() != self.ndim() {
            return None;
        }
        let mut index = 0;
        for (axis, &p) in pos.iter().enumerate() {
            if p >= self.grid[axis] {
                return None;
            }
            index = index * self.grid[axis] + p;
        }
        Some(index)
    }

    /// Core bounding box of a chunk in global coordinates
    pub fn core_box(&self, chunk: usize) -> Result<ChunkBox> {
        let pos = self.chunk_position(chunk)?;
        let start = pos
            .iter()
            .zip(&self.chunk_shape)
            .map(|(&p, &c)| p * c)
            .collect();
        let shape = pos
            .iter()
            .enumerate()
            .map(|(axis, &p)| self.extent(axis, p))
            .collect();
        ChunkBox::new(start, shape)
    }

    /// Core plus halo bounding box, clipped to the domain
    pub fn enlarged_box(&self, chunk: usize) -> Result<ChunkBox> {
        Ok(self
            .core_box(chunk)?
            .expand_clipped(self.halo_depth, &self.domain))
    }

    /// Chunk reached by stepping `direction` (each component in `-1..=1`)
    /// through the grid, or `None` when that leaves the domain
    pub fn neighbor(&self, chunk: usize, direction: &[i8]) -> Option<usize> {
        if direction.len() != self.ndim() {
            return None;
        }
        let pos = self.chunk_position(chunk).ok()?;
        let mut target = Vec::with_capacity(self.ndim());
        for (axis, (&p, &d)) in pos.iter().zip(direction).enumerate() {
            let next = p as isize + d as isize;
            if next < 0 || next >= self.grid[axis] as isize {
                return None;
            }
            target.push(next as usize);
        }
        self.chunk_index(&target)
    }

    /// The 2·N faces of a chunk with the halo slabs of `depth` cells that
    /// cross each one
    ///
    /// Faces are ordered by axis, lower side first. For two neighbors A and
    /// B sharing a face, A's `outer` slab equals B's `inner` slab on the
    /// opposite face.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown chunk or a depth the geometry
    /// cannot support.
    pub fn faces(&self, chunk: usize, depth: usize) -> Result<Vec<Face>> {
        self.check_halo_depth(depth)?;
        let core = self.core_box(chunk)?;
        if let Some(axis) = (0..self.ndim()).find(|&axis| depth > core.shape()[axis]) {
            return Err(Error::InvalidGeometry(format!(
                "face slab of depth {} does not fit chunk {} of extent {} on axis {}",
                depth,
                chunk,
                core.shape()[axis],
                axis
            )));
        }
        let mut faces = Vec::with_capacity(2 * self.ndim());

        for axis in 0..self.ndim() {
            for side in [Side::Lower, Side::Upper] {
                let mut direction = vec![0i8; self.ndim()];
                direction[axis] = side.step();
                let neighbor = match self.neighbor(chunk, &direction) {
                    Some(n) => Neighbor::Chunk(n),
                    None => Neighbor::DomainEdge,
                };

                let mut inner_start = core.start().to_vec();
                let mut inner_shape = core.shape().to_vec();
                inner_shape[axis] = depth;
                if side == Side::Upper {
                    inner_start[axis] = core.end(axis) - depth;
                }

                let outer = match neighbor {
                    Neighbor::Chunk(_) => {
                        let mut outer_start = core.start().to_vec();
                        outer_start[axis] = match side {
                            Side::Lower => core.start()[axis] - depth,
                            Side::Upper => core.end(axis),
                        };
                        Some(ChunkBox::new(outer_start, inner_shape.clone())?)
                    }
                    Neighbor::DomainEdge => None,
                };

                faces.push(Face {
                    axis,
                    side,
                    neighbor,
                    inner: ChunkBox::new(inner_start, inner_shape)?,
                    outer,
                });
            }
        }

        Ok(faces)
    }
}

/// Every direction in `{-1, 0, 1}^ndim`, in lexicographic order
///
/// The all-zero direction (the chunk itself) is included.
pub fn directions(ndim: usize) -> Vec<Vec<i8>> {
    let mut out = vec![Vec::with_capacity(ndim)];
    for _ in 0..ndim {
        let mut next = Vec::with_capacity(out.len() * 3);
        for prefix in &out {
            for step in [-1i8, 0, 1] {
                let mut d = prefix.clone();
                d.push(step);
                next.push(d);
            }
        }
        out = next;
    }
    out
}
