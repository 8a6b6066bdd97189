//! Chunked segmentation pipeline
//!
//! [`BoundaryReconciler`] drives one run end to end: it partitions the
//! inputs, exchanges the elevation halo, runs the two passes of the
//! configured [`Strategy`] and reassembles the global label map.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chunkshed_core::{
    ChunkedArray, ElevationMap, GridGeometry, LabelMap, MarkerMap, ensure_same_shape, exchange,
};
use chunkshed_region::{count_differences, flood_or_zero};

use crate::config::{ReconcileConfig, Strategy};
use crate::error::ReconcileResult;
use crate::pass::{Context, check_cancel};
use crate::report::{RunReport, seam_disagreements};
use crate::{direct, sentinel};

/// Labels of a finished run with its report
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Global label map with the domain's shape
    pub labels: LabelMap,
    /// Run summary
    pub report: RunReport,
}

/// Chunked watershed with two-pass boundary reconciliation
#[derive(Debug, Clone)]
pub struct BoundaryReconciler {
    config: ReconcileConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl BoundaryReconciler {
    /// Create a reconciler for the given configuration
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Attach a flag that cancels the run when raised
    ///
    /// The flag is checked before the first pass and at the barrier
    /// between the passes.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Segment `elevation` from `markers`
    ///
    /// # Errors
    ///
    /// All setup errors are raised before any flood runs:
    /// [`crate::ReconcileError::InvalidConfig`] for a bad configuration, a
    /// core `ShapeMismatch` if the inputs differ in shape, a core
    /// `InvalidGeometry` if the chunk shape does not fit the domain, and
    /// [`crate::ReconcileError::SentinelCollision`] if a seed carries the
    /// sentinel label. [`crate::ReconcileError::Cancelled`] is returned if
    /// the cancel flag is raised.
    pub fn segment(
        &self,
        elevation: &ElevationMap,
        markers: &MarkerMap,
    ) -> ReconcileResult<Segmentation> {
        let geometry = self.prepare(elevation, markers)?;
        let sentinel_label = match self.config.strategy {
            Strategy::DirectSharing => None,
            Strategy::SentinelBasinSharing => Some(self.config.resolve_sentinel(markers)?),
        };
        log::debug!(
            "segmenting {:?} in a {:?} grid of {:?} chunks, halo {}, {:?}",
            geometry.domain_shape(),
            geometry.grid_shape(),
            geometry.chunk_shape(),
            self.config.halo_depth,
            self.config.strategy
        );
        check_cancel(self.cancel.as_deref())?;

        if geometry.num_chunks() == 1 {
            return self.segment_whole(elevation, markers);
        }

        let elevation_chunks = ChunkedArray::split(elevation, &geometry)?;
        let elevation_chunks = exchange(
            &elevation_chunks,
            self.config.halo_depth,
            &self.config.boundary_policy,
        )?;
        let marker_chunks = ChunkedArray::split(markers, &geometry)?;
        let ctx = self.context(&geometry, &elevation_chunks, &marker_chunks);

        let passes = match sentinel_label {
            None => direct::run(&ctx)?,
            Some(label) => sentinel::run(&ctx, label)?,
        };

        let labels = passes.result.assemble()?;
        let first = passes.first.assemble()?;
        let report = RunReport {
            strategy: self.config.strategy,
            chunks: geometry.num_chunks(),
            first_pass_empty: passes.first_pass_empty,
            second_pass_empty: passes.second_pass_empty,
            relabeled_cells: count_differences(&first, &labels)?,
            seam_disagreements: seam_disagreements(&labels, &geometry)?,
        };
        log::debug!("{}", report);

        Ok(Segmentation { labels, report })
    }

    /// Naive chunked segmentation: the first pass only, with halo-padded
    /// seeds, trimmed and reassembled
    ///
    /// Basins that cross a chunk face are not reconciled, so the result can
    /// disagree with an unchunked flood along the seams. The configured
    /// strategy is ignored.
    pub fn segment_single_pass(
        &self,
        elevation: &ElevationMap,
        markers: &MarkerMap,
    ) -> ReconcileResult<LabelMap> {
        let geometry = self.prepare(elevation, markers)?;
        check_cancel(self.cancel.as_deref())?;

        let elevation_chunks = ChunkedArray::split(elevation, &geometry)?;
        let elevation_chunks = exchange(
            &elevation_chunks,
            self.config.halo_depth,
            &self.config.boundary_policy,
        )?;
        let marker_chunks = ChunkedArray::split(markers, &geometry)?;
        let ctx = self.context(&geometry, &elevation_chunks, &marker_chunks);

        let first = direct::first_pass(&ctx)?;
        Ok(first.labels.trim()?.assemble()?)
    }

    /// Setup checks shared by every entry point
    fn prepare(
        &self,
        elevation: &ElevationMap,
        markers: &MarkerMap,
    ) -> ReconcileResult<GridGeometry> {
        self.config.validate()?;
        ensure_same_shape(elevation.shape(), markers.shape())?;
        self.config.geometry(elevation.shape())
    }

    fn context<'a>(
        &'a self,
        geometry: &'a GridGeometry,
        elevation: &'a ChunkedArray<f32>,
        markers: &'a ChunkedArray<u32>,
    ) -> Context<'a> {
        Context {
            config: &self.config,
            geometry,
            elevation,
            markers,
            options: self.config.watershed_options(),
            cancel: self.cancel.as_deref(),
        }
    }

    /// One chunk covers the whole domain, so there is no boundary to
    /// reconcile
    fn segment_whole(
        &self,
        elevation: &ElevationMap,
        markers: &MarkerMap,
    ) -> ReconcileResult<Segmentation> {
        let (labels, empty) =
            flood_or_zero(elevation, markers, None, &self.config.watershed_options())?;
        let report = RunReport {
            strategy: self.config.strategy,
            chunks: 1,
            first_pass_empty: usize::from(empty),
            second_pass_empty: 0,
            relabeled_cells: 0,
            seam_disagreements: 0,
        };
        log::debug!("{}", report);
        Ok(Segmentation { labels, report })
    }
}

/// Segment `elevation` from `markers` with a one-off [`BoundaryReconciler`]
///
/// # Examples
///
/// ```
/// use chunkshed_reconcile::{ReconcileConfig, Strategy, segment_chunked};
/// use ndarray::{ArrayD, IxDyn};
///
/// let elevation = ArrayD::from_shape_fn(IxDyn(&[4, 4]), |idx| idx[1] as f32);
/// let mut markers = ArrayD::<u32>::zeros(IxDyn(&[4, 4]));
/// markers[IxDyn(&[0, 0])] = 1;
/// markers[IxDyn(&[3, 3])] = 2;
///
/// let config = ReconcileConfig::new(&[4, 2]).with_strategy(Strategy::SentinelBasinSharing);
/// let labels = segment_chunked(&elevation, &markers, &config).unwrap();
/// assert_eq!(labels.iter().filter(|&&l| l == 1).count(), 15);
/// assert_eq!(labels[IxDyn(&[3, 3])], 2);
/// ```
pub fn segment_chunked(
    elevation: &ElevationMap,
    markers: &MarkerMap,
    config: &ReconcileConfig,
) -> ReconcileResult<LabelMap> {
    let reconciler = BoundaryReconciler::new(config.clone());
    Ok(reconciler.segment(elevation, markers)?.labels)
}
