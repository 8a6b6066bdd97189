//! Run configuration

use chunkshed_core::{BoundaryPolicy, ChunkLayout, Elevation, GridGeometry, Label, MarkerMap};
use chunkshed_region::{Connectivity, WatershedOptions, max_label};

use crate::dispatch::Execution;
use crate::error::{ReconcileError, ReconcileResult};

/// How boundary information travels between the two passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Share every chunk's first-pass labels through the halo and flood
    /// each chunk again with them as extra seeds
    #[default]
    DirectSharing,
    /// Flood a sentinel basin in from the halo ring, then re-flood only
    /// the cells the sentinel claimed
    SentinelBasinSharing,
}

/// Configuration of a chunked segmentation run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileConfig {
    /// Nominal shape of every chunk
    pub chunk_shape: Vec<usize>,
    /// Halo depth exchanged between chunks (at least 1)
    pub halo_depth: usize,
    /// Fill policy for elevation halo outside the domain
    pub boundary_policy: BoundaryPolicy<Elevation>,
    /// Reconciliation strategy
    pub strategy: Strategy,
    /// Label reserved for undetermined cells; `None` picks
    /// `max(seed labels) + 1`
    pub sentinel_label: Option<Label>,
    /// Neighborhood of the watershed
    pub connectivity: Connectivity,
    /// Whether a smaller final chunk per axis is allowed
    pub layout: ChunkLayout,
    /// Scheduling of per-chunk work
    pub execution: Execution,
}

impl ReconcileConfig {
    /// Create a configuration with default values for the given chunk shape
    pub fn new(chunk_shape: &[usize]) -> Self {
        Self {
            chunk_shape: chunk_shape.to_vec(),
            halo_depth: 1,
            boundary_policy: BoundaryPolicy::Nearest,
            strategy: Strategy::default(),
            sentinel_label: None,
            connectivity: Connectivity::default(),
            layout: ChunkLayout::default(),
            execution: Execution::default(),
        }
    }

    /// Set halo depth
    pub fn with_halo_depth(mut self, depth: usize) -> Self {
        self.halo_depth = depth;
        self
    }

    /// Set the elevation boundary policy
    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy<Elevation>) -> Self {
        self.boundary_policy = policy;
        self
    }

    /// Set reconciliation strategy
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set an explicit sentinel label
    pub fn with_sentinel_label(mut self, label: Label) -> Self {
        self.sentinel_label = Some(label);
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set chunk layout
    pub fn with_layout(mut self, layout: ChunkLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set execution mode
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Check the settings that do not depend on the input
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidConfig`] for a zero halo depth, an
    /// empty chunk shape, or a sentinel label of 0.
    pub fn validate(&self) -> ReconcileResult<()> {
        if self.halo_depth == 0 {
            return Err(ReconcileError::InvalidConfig(
                "halo depth must be at least 1".to_string(),
            ));
        }
        if self.chunk_shape.is_empty() {
            return Err(ReconcileError::InvalidConfig(
                "chunk shape has no axes".to_string(),
            ));
        }
        if self.sentinel_label == Some(0) {
            return Err(ReconcileError::InvalidConfig(
                "sentinel label 0 is the unlabeled value".to_string(),
            ));
        }
        Ok(())
    }

    /// Partition of a domain of the given shape under this configuration
    pub fn geometry(&self, domain: &[usize]) -> ReconcileResult<GridGeometry> {
        Ok(GridGeometry::new(
            domain,
            &self.chunk_shape,
            self.halo_depth,
            self.layout,
        )?)
    }

    /// Watershed options every flood of the run uses
    pub fn watershed_options(&self) -> WatershedOptions {
        WatershedOptions::new().with_connectivity(self.connectivity)
    }

    /// Sentinel label for a run over `markers`
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::SentinelCollision`] if a seed carries the
    /// configured sentinel, and [`ReconcileError::InvalidConfig`] if the
    /// seeds leave no room for a default sentinel or the configured one
    /// is 0.
    pub fn resolve_sentinel(&self, markers: &MarkerMap) -> ReconcileResult<Label> {
        match self.sentinel_label {
            Some(0) => Err(ReconcileError::InvalidConfig(
                "sentinel label 0 is the unlabeled value".to_string(),
            )),
            Some(label) => {
                if markers.iter().any(|&m| m == label) {
                    Err(ReconcileError::SentinelCollision { label })
                } else {
                    Ok(label)
                }
            }
            None => max_label(markers).checked_add(1).ok_or_else(|| {
                ReconcileError::InvalidConfig(format!(
                    "seed label {} leaves no room for a sentinel",
                    Label::MAX
                ))
            }),
        }
    }
}
