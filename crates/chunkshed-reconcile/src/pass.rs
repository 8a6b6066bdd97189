//! State shared by the passes of one run

use std::sync::atomic::{AtomicBool, Ordering};

use chunkshed_core::{BoundaryMask, ChunkedArray, Elevation, Error, GridGeometry, Label};
use chunkshed_region::{WatershedOptions, flood_or_zero};

use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, ReconcileResult};

/// Inputs of a run after partitioning
pub(crate) struct Context<'a> {
    pub config: &'a ReconcileConfig,
    pub geometry: &'a GridGeometry,
    /// Elevation blocks with the halo already exchanged
    pub elevation: &'a ChunkedArray<Elevation>,
    /// Original seed markers, core blocks
    pub markers: &'a ChunkedArray<Label>,
    pub options: WatershedOptions,
    pub cancel: Option<&'a AtomicBool>,
}

/// Outcome of the two passes, as core blocks
pub(crate) struct Passes {
    pub first: ChunkedArray<Label>,
    pub result: ChunkedArray<Label>,
    pub first_pass_empty: usize,
    pub second_pass_empty: usize,
}

impl Context<'_> {
    /// Halo depth of the run
    pub fn depth(&self) -> usize {
        self.config.halo_depth
    }

    /// Fail with [`ReconcileError::Cancelled`] once the cancel flag is raised
    pub fn check_cancel(&self) -> ReconcileResult<()> {
        check_cancel(self.cancel)
    }

    /// Flood every padded elevation block from the matching padded
    /// marker block, optionally restricted to a per-chunk mask
    ///
    /// A chunk without seeds yields zeros. Returns the padded label blocks
    /// and the number of such empty chunks.
    pub fn flood_all(
        &self,
        markers: &ChunkedArray<Label>,
        masks: Option<&[BoundaryMask]>,
    ) -> ReconcileResult<(ChunkedArray<Label>, usize)> {
        let count = self.geometry.num_chunks();
        let outcomes = self.config.execution.try_map_chunks(count, |chunk| {
            let mask = match masks {
                Some(masks) => Some(masks.get(chunk).ok_or(Error::IndexOutOfBounds {
                    index: chunk,
                    len: masks.len(),
                })?),
                None => None,
            };
            let elevation = self.elevation.block(chunk)?;
            let seeds = markers.block(chunk)?;
            let (labels, empty) = flood_or_zero(elevation, seeds, mask, &self.options)?;
            if empty {
                log::trace!("chunk {}: no seeds", chunk);
            }
            Ok::<_, ReconcileError>((labels, empty))
        })?;

        let empty = outcomes.iter().filter(|(_, e)| *e).count();
        let blocks = outcomes.into_iter().map(|(labels, _)| labels).collect();
        let labels = ChunkedArray::from_blocks(self.geometry, markers.halo(), blocks)?;
        Ok((labels, empty))
    }
}

pub(crate) fn check_cancel(flag: Option<&AtomicBool>) -> ReconcileResult<()> {
    match flag {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(ReconcileError::Cancelled),
        _ => Ok(()),
    }
}
