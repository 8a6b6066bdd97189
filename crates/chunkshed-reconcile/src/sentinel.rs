//! Sentinel basin sharing
//!
//! Pass 1 plants a reserved sentinel label on the whole halo ring of every
//! chunk. Whatever the sentinel basin floods is exactly the part of the
//! chunk whose basin cannot be decided from the chunk's own seeds. Pass 2
//! re-floods only that region, seeded from the neighbors' decided labels,
//! and the two passes are composed.

use chunkshed_core::{
    BoundaryMask, BoundaryPolicy, ChunkedArray, Label, add_border, compose, exchange,
};

use crate::error::ReconcileResult;
use crate::pass::{Context, Passes};

pub(crate) fn run(ctx: &Context, sentinel: Label) -> ReconcileResult<Passes> {
    let depth = ctx.depth();

    let seeded = ctx
        .markers
        .blocks()
        .iter()
        .map(|block| add_border(block, depth, sentinel))
        .collect();
    let seeded = ChunkedArray::from_blocks(ctx.geometry, depth, seeded)?;
    let (first, first_empty) = ctx.flood_all(&seeded, None)?;

    let masks: Vec<BoundaryMask> = first
        .blocks()
        .iter()
        .map(|block| block.mapv(|label| label == sentinel))
        .collect();
    let undecided: usize = masks.iter().map(|m| m.iter().filter(|&&u| u).count()).sum();
    log::debug!(
        "sentinel sharing: pass 1 done, sentinel {} claimed {} cells",
        sentinel,
        undecided
    );

    let decided = first.map_blocks(|block| block.mapv(|l| if l == sentinel { 0 } else { l }))?;

    // Every pass-1 result is in before any halo is rebuilt.
    ctx.check_cancel()?;
    let shared = exchange(&decided.trim()?, depth, &BoundaryPolicy::Nearest)?;
    let (second, second_empty) = ctx.flood_all(&shared, Some(masks.as_slice()))?;
    log::debug!("sentinel sharing: pass 2 done, {} empty chunks", second_empty);

    let composed = masks
        .iter()
        .enumerate()
        .map(|(chunk, mask)| -> ReconcileResult<_> {
            Ok(compose(first.block(chunk)?, second.block(chunk)?, mask)?)
        })
        .collect::<ReconcileResult<Vec<_>>>()?;
    let result = ChunkedArray::from_blocks(ctx.geometry, depth, composed)?.trim()?;

    Ok(Passes {
        first: first.trim()?,
        result,
        first_pass_empty: first_empty,
        second_pass_empty: second_empty,
    })
}
