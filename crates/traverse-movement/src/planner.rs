//! Path planning: pick a cost strategy, run the search, optionally visualize.
//!
//! Regions flagged as anomalous are searched with the basic cost matrix;
//! everywhere else the contextual matrix is used, biased away from hostiles
//! and told whether origin and target share a region. Searches may cross
//! any number of regions.

use tracing::{debug, warn};
use traverse_types::{Agent, PathResult, Target, Tile};
use traverse_world::GridMap;

use crate::context::MoveContext;
use crate::search::{CostStrategy, SearchGoal, SearchOptions, WeightLookup};

/// Choose the cost strategy for a search from `origin` to `target`.
pub fn cost_strategy(grid: &GridMap, origin: &Tile, target: &Tile) -> CostStrategy {
    if grid.is_misplaced(origin.region) {
        return CostStrategy::Basic;
    }
    CostStrategy::Contextual {
        target: *target,
        bias_away_from_hostiles: true,
        same_region: origin.region == target.region,
    }
}

/// Search a path for `agent` toward `target`, ending within `range`.
///
/// The result is handed to the visualizer when visualization of path
/// searches is enabled; visualizer failures are logged and otherwise ignored.
pub fn compute_path(
    ctx: &MoveContext<'_>,
    grid: &GridMap,
    agent: &Agent,
    target: &Target,
    range: u32,
) -> PathResult {
    let target_tile = target.tile();
    let strategy = cost_strategy(grid, &agent.tile, &target_tile);
    let options = SearchOptions {
        weights: WeightLookup::new(ctx.costs, strategy),
        max_regions: None,
        swamp_cost: ctx.config.swamp_cost,
        plain_cost: ctx.config.plain_cost,
    };
    let goal = SearchGoal {
        tile: target_tile,
        range,
    };

    let result = ctx.search.search(grid, agent.tile, goal, &options);
    debug!(
        agent = %agent.id,
        origin = %agent.tile,
        target = %target_tile,
        range,
        ?strategy,
        steps = result.path.len(),
        incomplete = result.incomplete,
        cost = result.cost,
        "Path searched"
    );

    if ctx.config.visualize_searches() {
        if let Some(visualizer) = ctx.visualizer {
            if let Err(err) = visualizer.show_search(&agent.tile, &result) {
                warn!(agent = %agent.id, %err, "Path visualization failed");
            }
        }
    }

    result
}
