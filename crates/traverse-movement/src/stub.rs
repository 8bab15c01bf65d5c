//! Stub collaborators.
//!
//! These let the tick cycle run end-to-end without a real path-finding
//! backend or display. [`StraightLineSearch`] only walks the direct line to
//! the goal and gives up at the first blocked tile; it is not a substitute
//! for a real search.

use tracing::info;
use traverse_types::{
    Agent, Direction, GRID_SIZE, HostileKind, MoveCode, PathResult, RegionId, StructureKind,
    Target, Terrain, Tile,
};
use traverse_world::{CostMatrix, GridMap};

use crate::grid::AgentGrid;
use crate::search::{
    CostMatrixProvider, DirectApproach, PathSearch, SearchGoal, SearchOptions, VisualizationError,
    Visualizer,
};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Default cap on steps walked by [`StraightLineSearch`].
pub const DEFAULT_MAX_STEPS: u32 = 100;

/// Walks the direct line toward the goal, one tile at a time.
#[derive(Debug, Clone, Copy)]
pub struct StraightLineSearch {
    max_steps: u32,
}

impl StraightLineSearch {
    /// Create a search capped at [`DEFAULT_MAX_STEPS`].
    pub const fn new() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Override the step cap.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }
}

impl Default for StraightLineSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSearch for StraightLineSearch {
    fn search(
        &self,
        grid: &GridMap,
        origin: Tile,
        goal: SearchGoal,
        options: &SearchOptions<'_>,
    ) -> PathResult {
        let mut path = Vec::new();
        let mut cost: u32 = 0;
        let mut ops: u32 = 0;
        let mut regions = vec![origin.region];
        let mut matrix: (RegionId, Option<CostMatrix>) =
            (origin.region, options.weights.matrix_for(grid, origin.region));
        let mut current = origin;

        while current.range_to(&goal.tile) > goal.range {
            ops = ops.saturating_add(1);
            let next = match current.direction_to(&goal.tile) {
                Some(direction) if ops <= self.max_steps => current.adjacent(direction),
                _ => None,
            };
            let Some(next) = next else {
                return PathResult {
                    path,
                    incomplete: true,
                    cost,
                    ops,
                };
            };

            if next.region != matrix.0 {
                if !regions.contains(&next.region) {
                    regions.push(next.region);
                }
                let visited = u32::try_from(regions.len()).unwrap_or(u32::MAX);
                if options.max_regions.is_some_and(|max| visited > max) {
                    return PathResult {
                        path,
                        incomplete: true,
                        cost,
                        ops,
                    };
                }
                matrix = (next.region, options.weights.matrix_for(grid, next.region));
            }

            let weight = matrix.1.as_ref().map_or(0, |m| m.get(next.x, next.y));
            let reached = next == goal.tile;
            let blocked = grid.is_wall(&next)
                || (!reached
                    && (weight == CostMatrix::IMPASSABLE || grid.has_obstacle_structure(&next)));
            if blocked {
                return PathResult {
                    path,
                    incomplete: true,
                    cost,
                    ops,
                };
            }

            let step_cost = if weight > 0 && weight != CostMatrix::IMPASSABLE {
                u32::from(weight)
            } else if grid.terrain_at(&next) == Terrain::Swamp {
                options.swamp_cost
            } else {
                options.plain_cost
            };
            cost = cost.saturating_add(step_cost);
            path.push(next);
            current = next;
        }

        PathResult {
            path,
            incomplete: false,
            cost,
            ops,
        }
    }
}

// ---------------------------------------------------------------------------
// Cost matrices
// ---------------------------------------------------------------------------

/// Range around a guard that a hostile-biased matrix blocks.
pub const GUARD_AVOID_RANGE: u8 = 3;

/// Weight given to road tiles.
pub const ROAD_WEIGHT: u8 = 1;

/// Builds cost matrices from the structures and hostiles on the map.
///
/// Obstacle structures are blocked and roads are cheap. The contextual
/// matrix additionally blocks tiles near guards when asked to bias away from
/// hostiles, never blocking the target tile itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureCosts;

impl StructureCosts {
    fn structure_matrix(grid: &GridMap, region: RegionId) -> Option<CostMatrix> {
        let state = grid.region(region)?;
        let mut matrix = CostMatrix::new();
        for (&(x, y), structures) in &state.structures {
            if structures.iter().any(|s| s.kind.is_obstacle()) {
                matrix.set(x, y, CostMatrix::IMPASSABLE);
            } else if structures.iter().any(|s| s.kind == StructureKind::Road) {
                matrix.set(x, y, ROAD_WEIGHT);
            }
        }
        Some(matrix)
    }
}

impl CostMatrixProvider for StructureCosts {
    fn basic_cost_matrix(&self, grid: &GridMap, region: RegionId) -> Option<CostMatrix> {
        Self::structure_matrix(grid, region)
    }

    fn contextual_cost_matrix(
        &self,
        grid: &GridMap,
        region: RegionId,
        target: &Tile,
        bias_away_from_hostiles: bool,
        _same_region: bool,
    ) -> Option<CostMatrix> {
        let mut matrix = Self::structure_matrix(grid, region)?;
        if !bias_away_from_hostiles {
            return Some(matrix);
        }
        let state = grid.region(region)?;
        let last = GRID_SIZE.saturating_sub(1);
        for guard in state.hostiles.iter().filter(|h| h.kind == HostileKind::Guard) {
            let xs = guard.tile.x.saturating_sub(GUARD_AVOID_RANGE)
                ..=guard.tile.x.saturating_add(GUARD_AVOID_RANGE).min(last);
            for x in xs {
                let ys = guard.tile.y.saturating_sub(GUARD_AVOID_RANGE)
                    ..=guard.tile.y.saturating_add(GUARD_AVOID_RANGE).min(last);
                for y in ys {
                    if target.region == region && (target.x, target.y) == (x, y) {
                        continue;
                    }
                    matrix.set(x, y, CostMatrix::IMPASSABLE);
                }
            }
        }
        Some(matrix)
    }
}

// ---------------------------------------------------------------------------
// Direct approach
// ---------------------------------------------------------------------------

/// Steps straight toward the target, sidestepping one rotation either way
/// when the direct tile is blocked or taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyApproach;

impl GreedyApproach {
    fn walkable(grid: &dyn AgentGrid, tile: &Tile) -> bool {
        let map = grid.map();
        !map.is_wall(tile) && !map.has_obstacle_structure(tile) && !grid.is_occupied(tile)
    }
}

impl DirectApproach for GreedyApproach {
    fn approach(
        &mut self,
        agent: &Agent,
        target: &Target,
        range: u32,
        grid: &mut dyn AgentGrid,
    ) -> bool {
        let goal = target.tile();
        if agent.tile.range_to(&goal) <= range {
            return true;
        }
        let Some(direct) = agent.tile.direction_to(&goal) else {
            return true;
        };

        let candidates: [Direction; 3] = [direct, direct.rotate(1), direct.rotate(7)];
        let chosen = candidates.into_iter().find(|d| {
            agent
                .tile
                .adjacent(*d)
                .is_some_and(|t| Self::walkable(&*grid, &t))
        });

        chosen.is_some_and(|direction| grid.issue_move(agent.id, direction) == MoveCode::Ok)
    }
}

// ---------------------------------------------------------------------------
// Visualization
// ---------------------------------------------------------------------------

/// Writes search results to the log instead of a display.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogVisualizer;

impl Visualizer for LogVisualizer {
    fn show_search(&self, origin: &Tile, result: &PathResult) -> Result<(), VisualizationError> {
        info!(
            %origin,
            steps = result.path.len(),
            last = ?result.path.last(),
            incomplete = result.incomplete,
            cost = result.cost,
            ops = result.ops,
            "Path search"
        );
        Ok(())
    }
}
