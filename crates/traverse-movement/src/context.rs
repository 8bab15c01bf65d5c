//! Collaborators for one agent evaluation.

use crate::config::MovementConfig;
use crate::search::{CostMatrixProvider, DirectApproach, PathSearch, Visualizer};

/// Everything planning and stepping need besides the agent and the grid.
pub struct MoveContext<'a> {
    /// Movement tunables.
    pub config: &'a MovementConfig,
    /// The path-search primitive.
    pub search: &'a dyn PathSearch,
    /// The terrain-weight source.
    pub costs: &'a dyn CostMatrixProvider,
    /// The fallback stepper for degenerate searches.
    pub approach: &'a mut dyn DirectApproach,
    /// Optional display sink for search results.
    pub visualizer: Option<&'a dyn Visualizer>,
}

impl core::fmt::Debug for MoveContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MoveContext")
            .field("config", self.config)
            .field("visualizer", &self.visualizer.is_some())
            .finish_non_exhaustive()
    }
}
