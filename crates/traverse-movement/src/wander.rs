//! Random wandering, free or bounded.
//!
//! A wander picks a uniformly random start direction and scans the eight
//! directions clockwise from it. The first neighbour that passes every
//! filter is taken. When none passes, the last scanned direction is used
//! anyway, so a wander always issues exactly one move after at most eight
//! checks.

use rand::Rng;
use tracing::{debug, warn};
use traverse_types::{Agent, Direction, MoveCode, Tile};
use traverse_world::GridMap;

use crate::config::DEFAULT_WANDER_DISTANCE;
use crate::grid::AgentGrid;

/// Area a bounded wander must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WanderWindow {
    /// Tile to stay close to.
    pub goal: Tile,
    /// Maximum range from each goal.
    pub distance: u32,
    /// Optional second tile to stay close to as well.
    pub goal2: Option<Tile>,
}

impl WanderWindow {
    /// Stay within the default distance of `goal`.
    pub const fn new(goal: Tile) -> Self {
        Self {
            goal,
            distance: DEFAULT_WANDER_DISTANCE,
            goal2: None,
        }
    }

    /// Override the distance.
    #[must_use]
    pub const fn with_distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        self
    }

    /// Also stay within range of `goal2`.
    #[must_use]
    pub const fn with_second_goal(mut self, goal2: Tile) -> Self {
        self.goal2 = Some(goal2);
        self
    }

    /// Whether `tile` lies within range of every goal.
    pub fn contains(&self, tile: &Tile) -> bool {
        tile.range_to(&self.goal) <= self.distance
            && self
                .goal2
                .is_none_or(|goal2| tile.range_to(&goal2) <= self.distance)
    }
}

/// Extra constraint on wander candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WanderFilter {
    /// Any walkable, non-border neighbour.
    Free,
    /// Only neighbours on a known route.
    OnPath,
    /// Only neighbours inside the window.
    Within(WanderWindow),
}

/// Direction chosen by a scan, before any command is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WanderChoice {
    /// The direction to move in.
    pub direction: Direction,
    /// No candidate passed; `direction` is the last one scanned.
    pub exhausted: bool,
    /// Directions examined, at most eight.
    pub checks: u8,
}

/// Result of one wander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WanderReport {
    /// The commanded direction.
    pub direction: Direction,
    /// No candidate passed the filters.
    pub exhausted: bool,
    /// Directions examined.
    pub checks: u8,
    /// Code returned by the move command.
    pub code: MoveCode,
}

fn passes(
    map: &GridMap,
    origin: &Tile,
    direction: Direction,
    filter: &WanderFilter,
    border_offset: i32,
) -> bool {
    let Some(candidate) = origin.adjacent(direction) else {
        return false;
    };
    if candidate.is_border(border_offset) {
        return false;
    }
    match filter {
        WanderFilter::Free => {}
        WanderFilter::OnPath => {
            if !map.in_path(&candidate) {
                return false;
            }
        }
        WanderFilter::Within(window) => {
            if !window.contains(&candidate) {
                return false;
            }
        }
    }
    !map.is_wall(&candidate) && !map.has_obstacle_structure(&candidate)
}

/// Scan the eight directions clockwise from `start` and pick one.
pub fn choose_direction(
    map: &GridMap,
    origin: &Tile,
    start: Direction,
    filter: &WanderFilter,
    border_offset: i32,
) -> WanderChoice {
    let mut direction = start;
    for offset in 0..8u8 {
        direction = start.rotate(offset);
        if passes(map, origin, direction, filter, border_offset) {
            return WanderChoice {
                direction,
                exhausted: false,
                checks: offset.saturating_add(1),
            };
        }
    }
    WanderChoice {
        direction,
        exhausted: true,
        checks: 8,
    }
}

fn wander_with(
    grid: &mut dyn AgentGrid,
    agent: &Agent,
    filter: &WanderFilter,
    border_offset: i32,
    rng: &mut impl Rng,
) -> WanderReport {
    let start = Direction::Top.rotate(rng.random_range(0..8u8));
    let choice = choose_direction(grid.map(), &agent.tile, start, filter, border_offset);

    if choice.exhausted {
        warn!(
            agent = %agent.id,
            tile = %agent.tile,
            ?filter,
            direction = %choice.direction,
            "No wander candidate passed, using last scanned direction"
        );
    }

    let code = grid.issue_move(agent.id, choice.direction);
    debug!(
        agent = %agent.id,
        %start,
        direction = %choice.direction,
        checks = choice.checks,
        ?code,
        "Wander"
    );

    WanderReport {
        direction: choice.direction,
        exhausted: choice.exhausted,
        checks: choice.checks,
        code,
    }
}

/// Step `agent` in a random acceptable direction, optionally staying on
/// known routes.
pub fn wander(
    grid: &mut dyn AgentGrid,
    agent: &Agent,
    on_path: bool,
    border_offset: i32,
    rng: &mut impl Rng,
) -> WanderReport {
    let filter = if on_path {
        WanderFilter::OnPath
    } else {
        WanderFilter::Free
    };
    wander_with(grid, agent, &filter, border_offset, rng)
}

/// Step `agent` in a random acceptable direction inside `window`.
pub fn wander_within(
    grid: &mut dyn AgentGrid,
    agent: &Agent,
    window: &WanderWindow,
    border_offset: i32,
    rng: &mut impl Rng,
) -> WanderReport {
    wander_with(
        grid,
        agent,
        &WanderFilter::Within(*window),
        border_offset,
        rng,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use traverse_types::{AgentId, FactionId, RegionId, Role, Structure, StructureId, StructureKind};
    use traverse_world::{RegionState, TerrainGrid};

    use super::*;

    fn tile(x: u8, y: u8) -> Tile {
        Tile::new(x, y, RegionId::new(0, 0)).unwrap()
    }

    fn map_from(terrain: TerrainGrid) -> GridMap {
        let mut map = GridMap::new();
        map.add_region(RegionId::new(0, 0), RegionState::new(terrain))
            .unwrap();
        map
    }

    fn walled_except(open: Tile) -> GridMap {
        let mut terrain = TerrainGrid::plain();
        let centre = tile(10, 10);
        for direction in Direction::ALL {
            let t = centre.adjacent(direction).unwrap();
            if t != open {
                terrain.set(t.x, t.y, traverse_types::Terrain::Wall).unwrap();
            }
        }
        map_from(terrain)
    }

    struct MoveLog {
        map: GridMap,
        moves: Vec<Direction>,
    }

    impl AgentGrid for MoveLog {
        fn map(&self) -> &GridMap {
            &self.map
        }

        fn is_occupied(&self, _tile: &Tile) -> bool {
            false
        }

        fn occupant_mut(&mut self, _tile: &Tile) -> Option<&mut Agent> {
            None
        }

        fn issue_move(&mut self, _agent: AgentId, direction: Direction) -> MoveCode {
            self.moves.push(direction);
            MoveCode::Ok
        }

        fn eliminate(&mut self, _agent: AgentId) {}

        fn dismantle(&mut self, _agent: AgentId, _structure: StructureId) {}

        fn say(&mut self, _agent: AgentId, _message: &str) {}
    }

    #[test]
    fn open_ground_takes_start_direction() {
        let map = map_from(TerrainGrid::plain());
        for start in Direction::ALL {
            let choice = choose_direction(&map, &tile(10, 10), start, &WanderFilter::Free, 0);
            assert_eq!(choice.direction, start);
            assert_eq!(choice.checks, 1);
            assert!(!choice.exhausted);
        }
    }

    #[test]
    fn only_open_neighbour_is_found() {
        let open = tile(9, 11);
        let map = walled_except(open);
        for start in Direction::ALL {
            let choice = choose_direction(&map, &tile(10, 10), start, &WanderFilter::Free, 0);
            assert_eq!(choice.direction, Direction::BottomLeft);
            assert!(choice.checks <= 8);
        }
    }

    #[test]
    fn exhausted_scan_uses_last_direction() {
        let mut map = walled_except(tile(10, 9));
        map.add_structure(Structure::new(StructureKind::Spawn, tile(10, 9), None))
            .unwrap();
        let choice = choose_direction(&map, &tile(10, 10), Direction::Right, &WanderFilter::Free, 0);
        assert!(choice.exhausted);
        assert_eq!(choice.checks, 8);
        assert_eq!(choice.direction, Direction::TopRight);
    }

    #[test]
    fn border_neighbours_are_skipped() {
        let map = map_from(TerrainGrid::plain());
        // From (1, 1) every neighbour with a 0 coordinate is border.
        let choice = choose_direction(&map, &tile(1, 1), Direction::Top, &WanderFilter::Free, 0);
        assert_eq!(choice.direction, Direction::Right);
        assert_eq!(choice.checks, 3);
    }

    #[test]
    fn on_path_filter_requires_route_tile() {
        let mut map = map_from(TerrainGrid::plain());
        map.mark_path(&tile(10, 11)).unwrap();
        let choice = choose_direction(&map, &tile(10, 10), Direction::Top, &WanderFilter::OnPath, 0);
        assert_eq!(choice.direction, Direction::Bottom);
    }

    #[test]
    fn window_keeps_agent_near_both_goals() {
        let map = map_from(TerrainGrid::plain());
        let window = WanderWindow::new(tile(10, 7))
            .with_distance(3)
            .with_second_goal(tile(13, 10));
        let choice = choose_direction(
            &map,
            &tile(10, 10),
            Direction::Left,
            &WanderFilter::Within(window),
            0,
        );
        let landed = tile(10, 10).adjacent(choice.direction).unwrap();
        assert!(window.contains(&landed));
        assert_eq!(choice.direction, Direction::Top);
    }

    #[test]
    fn wander_issues_exactly_one_move() {
        let mut grid = MoveLog {
            map: walled_except(tile(11, 10)),
            moves: Vec::new(),
        };
        let agent = Agent::new(Role::Generic, tile(10, 10), FactionId::new());
        let mut rng = SmallRng::seed_from_u64(42);
        let report = wander(&mut grid, &agent, false, 0, &mut rng);
        assert_eq!(grid.moves, vec![Direction::Right]);
        assert_eq!(report.direction, Direction::Right);
        assert_eq!(report.code, MoveCode::Ok);
        assert!(!report.exhausted);
    }

    #[test]
    fn wander_within_respects_window() {
        let mut grid = MoveLog {
            map: map_from(TerrainGrid::plain()),
            moves: Vec::new(),
        };
        let agent = Agent::new(Role::Upgrader, tile(20, 20), FactionId::new());
        let window = WanderWindow::new(tile(20, 23)).with_distance(3);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..32 {
            let report = wander_within(&mut grid, &agent, &window, 0, &mut rng);
            let landed = agent.tile.adjacent(report.direction).unwrap();
            assert!(window.contains(&landed));
        }
    }
}
