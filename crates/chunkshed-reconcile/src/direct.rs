//! Direct first-pass sharing
//!
//! Pass 1 floods every chunk with its own seeds plus the seeds that fall in
//! its halo. The pass-1 labels of all chunks are then exchanged, and pass 2
//! floods every chunk again with the neighbors' labels planted as extra
//! seeds along its halo ring, so a basin that crossed a chunk face arrives
//! from the right side with the right label.

use chunkshed_core::{
    BoundaryMask, BoundaryPolicy, ChunkedArray, Label, LabelMap, MarkerMap, border_ring, compose,
    ensure_same_shape, exchange,
};
use ndarray::Zip;

use crate::error::ReconcileResult;
use crate::pass::{Context, Passes};

/// Seeds and labels of the first pass, as padded blocks
pub(crate) struct FirstPass {
    pub seeds: ChunkedArray<Label>,
    pub labels: ChunkedArray<Label>,
    pub empty: usize,
}

/// Flood every chunk from its halo-padded original seeds
///
/// Seed halo beyond the domain edge is empty.
pub(crate) fn first_pass(ctx: &Context) -> ReconcileResult<FirstPass> {
    let seeds = exchange(ctx.markers, ctx.depth(), &BoundaryPolicy::Constant(0))?;
    let (labels, empty) = ctx.flood_all(&seeds, None)?;
    log::debug!("direct sharing: pass 1 done, {} empty chunks", empty);
    Ok(FirstPass {
        seeds,
        labels,
        empty,
    })
}

pub(crate) fn run(ctx: &Context) -> ReconcileResult<Passes> {
    let depth = ctx.depth();
    let first = first_pass(ctx)?;
    let first_core = first.labels.trim()?;

    // Every pass-1 result is in before any halo is rebuilt.
    ctx.check_cancel()?;
    let shared = exchange(&first_core, depth, &BoundaryPolicy::Constant(0))?;

    let merged = (0..ctx.geometry.num_chunks())
        .map(|chunk| merge_markers(first.seeds.block(chunk)?, shared.block(chunk)?, depth))
        .collect::<ReconcileResult<Vec<_>>>()?;
    let merged = ChunkedArray::from_blocks(ctx.geometry, depth, merged)?;

    let (second, second_empty) = ctx.flood_all(&merged, None)?;
    log::debug!("direct sharing: pass 2 done, {} empty chunks", second_empty);

    Ok(Passes {
        first: first_core,
        result: second.trim()?,
        first_pass_empty: first.empty,
        second_pass_empty: second_empty,
    })
}

/// Second-pass seeds of one padded block
///
/// Original seeds always win; elsewhere on the halo ring the neighbor's
/// pass-1 label is planted; the core is otherwise left unseeded.
fn merge_markers(
    seeds: &MarkerMap,
    shared: &LabelMap,
    depth: usize,
) -> ReconcileResult<MarkerMap> {
    ensure_same_shape(seeds.shape(), shared.shape())?;
    let ring = border_ring(seeds.shape(), depth);
    let borrow: BoundaryMask = Zip::from(&ring)
        .and(seeds)
        .map_collect(|&on_ring, &seed| on_ring && seed == 0);
    Ok(compose(seeds, shared, &borrow)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn test_merge_markers() {
        // 4x4 padded block, depth 1: ring of 12 cells around a 2x2 core
        let mut seeds = ArrayD::<u32>::zeros(IxDyn(&[4, 4]));
        seeds[IxDyn(&[0, 1])] = 5; // seed in the halo
        seeds[IxDyn(&[1, 1])] = 6; // seed in the core
        let shared = ArrayD::from_elem(IxDyn(&[4, 4]), 9u32);

        let merged = merge_markers(&seeds, &shared, 1).unwrap();
        assert_eq!(merged[IxDyn(&[0, 1])], 5);
        assert_eq!(merged[IxDyn(&[1, 1])], 6);
        assert_eq!(merged[IxDyn(&[1, 2])], 0);
        assert_eq!(merged[IxDyn(&[2, 2])], 0);
        assert_eq!(merged[IxDyn(&[0, 0])], 9);
        assert_eq!(merged[IxDyn(&[3, 2])], 9);
        assert_eq!(merged.iter().filter(|&&m| m == 9).count(), 11);
    }

    #[test]
    fn test_merge_markers_shape_mismatch() {
        let seeds = ArrayD::<u32>::zeros(IxDyn(&[4, 4]));
        let shared = ArrayD::<u32>::zeros(IxDyn(&[4, 3]));
        assert!(merge_markers(&seeds, &shared, 1).is_err());
    }
}
