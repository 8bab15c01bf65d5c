//! Collaborator contracts used by planning and stepping.
//!
//! The path-search algorithm, the source of terrain weights, the greedy
//! fallback stepper and the visualization sink all live outside this crate.
//! Planning only chooses *which* weights to search with and how to treat the
//! result.

use traverse_types::{Agent, PathResult, RegionId, Target, Tile};
use traverse_world::{CostMatrix, GridMap};

use crate::grid::AgentGrid;

/// Which cost matrix the search should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostStrategy {
    /// Terrain and structures only. Used in anomalous regions.
    Basic,
    /// Target-aware weights.
    Contextual {
        /// The tile being searched toward.
        target: Tile,
        /// Steer away from hostile and contested tiles.
        bias_away_from_hostiles: bool,
        /// Origin and target share a region.
        same_region: bool,
    },
}

/// Source of per-region terrain weights.
pub trait CostMatrixProvider {
    /// Weights from terrain and structures only. `None` means "search the
    /// region with terrain defaults".
    fn basic_cost_matrix(&self, grid: &GridMap, region: RegionId) -> Option<CostMatrix>;

    /// Weights aware of the target and of hostile activity.
    fn contextual_cost_matrix(
        &self,
        grid: &GridMap,
        region: RegionId,
        target: &Tile,
        bias_away_from_hostiles: bool,
        same_region: bool,
    ) -> Option<CostMatrix>;
}

/// A provider paired with the chosen strategy, handed to the search as its
/// per-region weight callback.
#[derive(Clone, Copy)]
pub struct WeightLookup<'a> {
    provider: &'a dyn CostMatrixProvider,
    strategy: CostStrategy,
}

impl<'a> WeightLookup<'a> {
    /// Pair `provider` with `strategy`.
    pub const fn new(provider: &'a dyn CostMatrixProvider, strategy: CostStrategy) -> Self {
        Self { provider, strategy }
    }

    /// The chosen strategy.
    pub const fn strategy(&self) -> CostStrategy {
        self.strategy
    }

    /// Weights for `region` under the chosen strategy.
    pub fn matrix_for(&self, grid: &GridMap, region: RegionId) -> Option<CostMatrix> {
        match self.strategy {
            CostStrategy::Basic => self.provider.basic_cost_matrix(grid, region),
            CostStrategy::Contextual {
                target,
                bias_away_from_hostiles,
                same_region,
            } => self.provider.contextual_cost_matrix(
                grid,
                region,
                &target,
                bias_away_from_hostiles,
                same_region,
            ),
        }
    }
}

impl core::fmt::Debug for WeightLookup<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WeightLookup")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Where the search should end: any tile within `range` of `tile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchGoal {
    /// The target tile.
    pub tile: Tile,
    /// Acceptable distance from the target.
    pub range: u32,
}

/// Parameters for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions<'a> {
    /// Per-region weights.
    pub weights: WeightLookup<'a>,
    /// Maximum number of regions to traverse; `None` for no cap.
    pub max_regions: Option<u32>,
    /// Cost of a swamp tile without an override.
    pub swamp_cost: u32,
    /// Cost of a plain tile without an override.
    pub plain_cost: u32,
}

/// The low-level path-search primitive.
///
/// Implementations must be deterministic for identical grid state and inputs.
pub trait PathSearch {
    /// Search from `origin` toward `goal`.
    fn search(
        &self,
        grid: &GridMap,
        origin: Tile,
        goal: SearchGoal,
        options: &SearchOptions<'_>,
    ) -> PathResult;
}

/// The greedy, path-unaware stepper used when a search result is degenerate.
pub trait DirectApproach {
    /// Step `agent` toward `target` until within `range`. Returns whether a
    /// movement command was accepted (or none was needed).
    fn approach(
        &mut self,
        agent: &Agent,
        target: &Target,
        range: u32,
        grid: &mut dyn AgentGrid,
    ) -> bool;
}

/// Error reported by a visualization sink. Never affects movement.
#[derive(Debug, thiserror::Error)]
pub enum VisualizationError {
    /// The sink could not accept the search result.
    #[error("visualization sink unavailable: {reason}")]
    Unavailable {
        /// Why the sink refused.
        reason: String,
    },
}

/// Display-only consumer of search results.
pub trait Visualizer {
    /// Show one search result.
    ///
    /// # Errors
    ///
    /// Returns [`VisualizationError`] if the sink cannot display the result.
    fn show_search(&self, origin: &Tile, result: &PathResult) -> Result<(), VisualizationError>;
}
