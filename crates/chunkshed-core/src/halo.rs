//! Halo exchange
//!
//! Builds, for every chunk, a block holding the chunk's core plus a halo of
//! `depth` cells copied from the logically adjacent chunks. Corners come
//! from diagonal neighbors, so an N-dimensional exchange sees all `3^N - 1`
//! surrounding chunks.
//!
//! Where the halo reaches past the domain edge there is no chunk to copy
//! from and a [`BoundaryPolicy`] decides what to write instead.
//!
//! Exchange only ever reads the core blocks it was given, so every chunk
//! observes the same pre-exchange snapshot of its neighbors.

use crate::chunked::ChunkedArray;
use crate::error::{Error, Result};
use crate::geometry::{GridGeometry, directions};
use ndarray::{ArrayD, IxDyn, Slice};
use std::ops::Range;

/// What to write into halo cells that fall outside the domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryPolicy<T> {
    /// Replicate the nearest value inside the domain
    Nearest,
    /// Fill with a fixed value
    Constant(T),
}

impl<T> Default for BoundaryPolicy<T> {
    fn default() -> Self {
        BoundaryPolicy::Nearest
    }
}

/// Source of one halo region of a padded block
enum RegionSource<T> {
    Fill(T),
    Copy {
        chunk: usize,
        ranges: Vec<Range<usize>>,
    },
}

/// Exchange halos between all chunks
///
/// # Arguments
///
/// * `chunks` - Core blocks (halo depth 0)
/// * `depth` - Halo depth to build
/// * `policy` - Fill policy for halo cells outside the domain
///
/// # Returns
///
/// Blocks carrying a halo of `depth` cells; interior halo cells are exact
/// copies of the neighbor's core cells.
///
/// # Errors
///
/// Returns an error if the blocks already carry a halo or if `depth` is
/// too deep for the geometry.
pub fn exchange<T: Clone>(
    chunks: &ChunkedArray<T>,
    depth: usize,
    policy: &BoundaryPolicy<T>,
) -> Result<ChunkedArray<T>> {
    if chunks.halo() != 0 {
        return Err(Error::InvalidParameter(format!(
            "exchange expects core blocks, got halo depth {}",
            chunks.halo()
        )));
    }
    let geometry = chunks.geometry();
    geometry.check_halo_depth(depth)?;

    let blocks = (0..geometry.num_chunks())
        .map(|chunk| pad_chunk(chunks, chunk, depth, policy))
        .collect::<Result<Vec<_>>>()?;
    log::trace!(
        "halo exchange: {} chunks, depth {}",
        geometry.num_chunks(),
        depth
    );
    ChunkedArray::from_blocks(geometry, depth, blocks)
}

/// Build the padded block of one chunk
fn pad_chunk<T: Clone>(
    chunks: &ChunkedArray<T>,
    chunk: usize,
    depth: usize,
    policy: &BoundaryPolicy<T>,
) -> Result<ArrayD<T>> {
    let geometry = chunks.geometry();
    let own = chunks.block(chunk)?;
    let core_shape = own.shape();
    let padded_shape: Vec<usize> = core_shape.iter().map(|&s| s + 2 * depth).collect();

    // Seed with the first core value; every cell is overwritten below.
    let seed = own.iter().next().cloned().ok_or_else(|| {
        Error::InvalidParameter(format!("chunk {} has an empty block", chunk))
    })?;
    let mut out = ArrayD::from_elem(IxDyn(&padded_shape), seed);

    for direction in directions(geometry.ndim()) {
        if depth == 0 && direction.iter().any(|&d| d != 0) {
            continue;
        }
        let target: Vec<Range<usize>> = direction
            .iter()
            .zip(core_shape)
            .map(|(&d, &extent)| match d {
                -1 => 0..depth,
                0 => depth..depth + extent,
                _ => depth + extent..2 * depth + extent,
            })
            .collect();

        let mut view =
            out.slice_each_axis_mut(|ax| Slice::from(target[ax.axis.index()].clone()));
        match region_source(geometry, chunks, chunk, &direction, depth, policy)? {
            RegionSource::Fill(value) => view.fill(value),
            RegionSource::Copy { chunk: src, ranges } => {
                let block = chunks.block(src)?;
                let source =
                    block.slice_each_axis(|ax| Slice::from(ranges[ax.axis.index()].clone()));
                // Clamped axes have length 1 and broadcast across the halo.
                view.assign(&source);
            }
        }
    }

    Ok(out)
}

/// Find where the halo region of `chunk` in `direction` comes from
fn region_source<T: Clone>(
    geometry: &GridGeometry,
    chunks: &ChunkedArray<T>,
    chunk: usize,
    direction: &[i8],
    depth: usize,
    policy: &BoundaryPolicy<T>,
) -> Result<RegionSource<T>> {
    let core = geometry.core_box(chunk)?;
    let domain = geometry.domain_shape();

    // Axes on which the region leaves the domain collapse onto the chunk
    // itself; remember which edge to replicate.
    let mut source_direction = direction.to_vec();
    let mut clamped: Vec<Option<i8>> = vec![None; direction.len()];
    for (axis, &d) in direction.iter().enumerate() {
        let outside =
            (d < 0 && core.start()[axis] == 0) || (d > 0 && core.end(axis) == domain[axis]);
        if outside {
            clamped[axis] = Some(d);
            source_direction[axis] = 0;
        }
    }

    if clamped.iter().any(Option::is_some) {
        if let BoundaryPolicy::Constant(value) = policy {
            return Ok(RegionSource::Fill(value.clone()));
        }
    }

    let src = geometry
        .neighbor(chunk, &source_direction)
        .ok_or_else(|| {
            Error::InvalidGeometry(format!(
                "chunk {} has no neighbor in direction {:?}",
                chunk, source_direction
            ))
        })?;
    let src_shape = chunks.block(src)?.shape();

    let ranges = (0..direction.len())
        .map(|axis| {
            let extent = src_shape[axis];
            match (clamped[axis], direction[axis]) {
                (Some(d), _) if d < 0 => 0..1,
                (Some(_), _) => extent - 1..extent,
                (None, 0) => 0..extent,
                (None, d) if d < 0 => extent - depth..extent,
                (None, _) => 0..depth,
            }
        })
        .collect();

    Ok(RegionSource::Copy { chunk: src, ranges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ChunkLayout;

    fn domain(shape: &[usize]) -> ArrayD<u32> {
        let len = shape.iter().product::<usize>() as u32;
        ArrayD::from_shape_vec(IxDyn(shape), (1..=len).collect()).unwrap()
    }

    fn rows(block: &ArrayD<u32>) -> Vec<Vec<u32>> {
        block
            .outer_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    #[test]
    fn test_exchange_two_chunks_nearest() {
        // 2x4 domain, two 2x2 chunks:
        //   1 2 | 3 4
        //   5 6 | 7 8
        let g = GridGeometry::new(&[2, 4], &[2, 2], 1, ChunkLayout::Exact).unwrap();
        let chunks = ChunkedArray::split(&domain(&[2, 4]), &g).unwrap();
        let padded = exchange(&chunks, 1, &BoundaryPolicy::Nearest).unwrap();
        assert_eq!(padded.halo(), 1);

        assert_eq!(
            rows(padded.block(0).unwrap()),
            vec![
                vec![1, 1, 2, 3],
                vec![1, 1, 2, 3],
                vec![5, 5, 6, 7],
                vec![5, 5, 6, 7],
            ]
        );
        assert_eq!(
            rows(padded.block(1).unwrap()),
            vec![
                vec![2, 3, 4, 4],
                vec![2, 3, 4, 4],
                vec![6, 7, 8, 8],
                vec![6, 7, 8, 8],
            ]
        );
    }

    #[test]
    fn test_exchange_constant() {
        let g = GridGeometry::new(&[2, 4], &[2, 2], 1, ChunkLayout::Exact).unwrap();
        let chunks = ChunkedArray::split(&domain(&[2, 4]), &g).unwrap();
        let padded = exchange(&chunks, 1, &BoundaryPolicy::Constant(0)).unwrap();
        assert_eq!(
            rows(padded.block(0).unwrap()),
            vec![
                vec![0, 0, 0, 0],
                vec![0, 1, 2, 3],
                vec![0, 5, 6, 7],
                vec![0, 0, 0, 0],
            ]
        );
    }

    #[test]
    fn test_exchange_corners_from_diagonal_neighbor() {
        // 4x4 domain in four 2x2 chunks; chunk 0's lower-right halo corner
        // must come from chunk 3.
        let g = GridGeometry::new(&[4, 4], &[2, 2], 1, ChunkLayout::Exact).unwrap();
        let chunks = ChunkedArray::split(&domain(&[4, 4]), &g).unwrap();
        let padded = exchange(&chunks, 1, &BoundaryPolicy::Constant(0)).unwrap();
        let b0 = padded.block(0).unwrap();
        assert_eq!(b0[IxDyn(&[3, 3])], 11);
        assert_eq!(b0[IxDyn(&[3, 1])], 9);
        assert_eq!(b0[IxDyn(&[1, 3])], 3);

        let b3 = padded.block(3).unwrap();
        assert_eq!(b3[IxDyn(&[0, 0])], 6);
        assert_eq!(b3[IxDyn(&[3, 3])], 0);
    }

    #[test]
    fn test_exchange_nearest_corner_at_edge() {
        let g = GridGeometry::new(&[4, 4], &[2, 2], 1, ChunkLayout::Exact).unwrap();
        let chunks = ChunkedArray::split(&domain(&[4, 4]), &g).unwrap();
        let padded = exchange(&chunks, 1, &BoundaryPolicy::Nearest).unwrap();
        // Chunk 1 covers rows 0-1, cols 2-3. Its top-left halo corner is
        // above the domain, so it replicates row 0 of chunk 0's last column.
        let b1 = padded.block(1).unwrap();
        assert_eq!(b1[IxDyn(&[0, 0])], 2);
        assert_eq!(b1[IxDyn(&[0, 3])], 4);
        assert_eq!(b1[IxDyn(&[3, 0])], 10);
        assert_eq!(b1[IxDyn(&[3, 3])], 12);
    }

    #[test]
    fn test_exchange_depth_two_ragged() {
        let g = GridGeometry::new(&[9], &[4], 2, ChunkLayout::Ragged).unwrap_err();
        assert!(matches!(g, Error::InvalidGeometry(_)));

        let g = GridGeometry::new(&[10], &[4], 1, ChunkLayout::Ragged).unwrap();
        let chunks = ChunkedArray::split(&domain(&[10]), &g).unwrap();
        let padded = exchange(&chunks, 1, &BoundaryPolicy::Nearest).unwrap();
        let last: Vec<u32> = padded.block(2).unwrap().iter().copied().collect();
        assert_eq!(last, vec![8, 9, 10, 10]);
    }

    #[test]
    fn test_exchange_requires_core_blocks() {
        let g = GridGeometry::new(&[2, 4], &[2, 2], 1, ChunkLayout::Exact).unwrap();
        let chunks = ChunkedArray::split(&domain(&[2, 4]), &g).unwrap();
        let padded = exchange(&chunks, 1, &BoundaryPolicy::Nearest).unwrap();
        assert!(exchange(&padded, 1, &BoundaryPolicy::Nearest).is_err());
        assert!(exchange(&chunks, 2, &BoundaryPolicy::Nearest).is_err());
    }

    #[test]
    fn test_exchange_then_trim_restores_core() {
        let g = GridGeometry::new(&[6, 4, 4], &[3, 2, 4], 1, ChunkLayout::Exact).unwrap();
        let chunks = ChunkedArray::split(&domain(&[6, 4, 4]), &g).unwrap();
        for policy in [BoundaryPolicy::Nearest, BoundaryPolicy::Constant(0)] {
            let padded = exchange(&chunks, 1, &policy).unwrap();
            assert_eq!(padded.trim().unwrap(), chunks);
        }
    }
}
