//! Obstacle clearing: dismantle whatever blocks the tile straight ahead.

use tracing::info;
use traverse_types::{Agent, Direction, FactionId, Structure, StructureId, StructureKind};
use traverse_world::GridMap;

use crate::grid::AgentGrid;

/// Marker emitted above an agent that starts dismantling.
pub const DISMANTLE_MARKER: &str = "dismantle";

/// Whether `structure` is never cleared for an agent of `faction`: roads,
/// and the faction's own ramparts and spawns.
pub fn is_exempt(structure: &Structure, faction: FactionId) -> bool {
    match structure.kind {
        StructureKind::Road => true,
        StructureKind::Rampart | StructureKind::Spawn => structure.is_owned_by(faction),
        _ => false,
    }
}

/// The first non-exempt structure on the tile ahead of `agent`.
pub fn forward_obstacle<'m>(
    map: &'m GridMap,
    agent: &Agent,
    forward: Direction,
) -> Option<&'m Structure> {
    let ahead = agent.tile.adjacent(forward)?;
    map.structures_at(&ahead)
        .iter()
        .find(|s| !is_exempt(s, agent.faction))
}

/// Dismantle the first non-exempt structure ahead of `agent`.
///
/// Does nothing without a forward direction. At most one structure is
/// targeted per call.
pub fn clear_forward_obstacle(
    grid: &mut dyn AgentGrid,
    agent: &Agent,
    forward: Option<Direction>,
) -> Option<StructureId> {
    let forward = forward?;
    let (structure, kind) = {
        let found = forward_obstacle(grid.map(), agent, forward)?;
        (found.id, found.kind)
    };

    grid.dismantle(agent.id, structure);
    grid.say(agent.id, DISMANTLE_MARKER);
    info!(agent = %agent.id, %structure, ?kind, %forward, "Dismantling obstacle ahead");
    Some(structure)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use traverse_types::{AgentId, MoveCode, RegionId, Role, Tile};
    use traverse_world::RegionState;

    use super::*;

    fn tile(x: u8, y: u8) -> Tile {
        Tile::new(x, y, RegionId::new(0, 0)).unwrap()
    }

    struct Recorder {
        map: GridMap,
        dismantled: Vec<StructureId>,
        said: Vec<String>,
    }

    impl Recorder {
        fn new() -> Self {
            let mut map = GridMap::new();
            map.add_region(RegionId::new(0, 0), RegionState::default())
                .unwrap();
            Self {
                map,
                dismantled: Vec::new(),
                said: Vec::new(),
            }
        }
    }

    impl AgentGrid for Recorder {
        fn map(&self) -> &GridMap {
            &self.map
        }

        fn is_occupied(&self, _tile: &Tile) -> bool {
            false
        }

        fn occupant_mut(&mut self, _tile: &Tile) -> Option<&mut Agent> {
            None
        }

        fn issue_move(&mut self, _agent: AgentId, _direction: Direction) -> MoveCode {
            MoveCode::Ok
        }

        fn eliminate(&mut self, _agent: AgentId) {}

        fn dismantle(&mut self, _agent: AgentId, structure: StructureId) {
            self.dismantled.push(structure);
        }

        fn say(&mut self, _agent: AgentId, message: &str) {
            self.said.push(message.to_owned());
        }
    }

    #[test]
    fn no_forward_direction_is_noop() {
        let mut grid = Recorder::new();
        let agent = Agent::new(Role::Sourcer, tile(10, 10), FactionId::new());
        grid.map
            .add_structure(Structure::new(StructureKind::ConstructedWall, tile(10, 9), None))
            .unwrap();
        assert_eq!(clear_forward_obstacle(&mut grid, &agent, None), None);
        assert!(grid.dismantled.is_empty());
        assert!(grid.said.is_empty());
    }

    #[test]
    fn exempt_structures_are_skipped_and_first_other_is_cleared() {
        let mut grid = Recorder::new();
        let faction = FactionId::new();
        let agent = Agent::new(Role::Sourcer, tile(10, 10), faction);
        let ahead = tile(10, 9);
        for structure in [
            Structure::new(StructureKind::Road, ahead, None),
            Structure::new(StructureKind::Rampart, ahead, Some(faction)),
            Structure::new(StructureKind::Spawn, ahead, Some(faction)),
        ] {
            grid.map.add_structure(structure).unwrap();
        }
        let wall = grid
            .map
            .add_structure(Structure::new(StructureKind::ConstructedWall, ahead, None))
            .unwrap();
        grid.map
            .add_structure(Structure::new(StructureKind::Tower, ahead, None))
            .unwrap();

        let cleared = clear_forward_obstacle(&mut grid, &agent, Some(Direction::Top));
        assert_eq!(cleared, Some(wall));
        assert_eq!(grid.dismantled, vec![wall]);
        assert_eq!(grid.said, vec![DISMANTLE_MARKER.to_owned()]);
    }

    #[test]
    fn foreign_rampart_is_cleared() {
        let mut grid = Recorder::new();
        let agent = Agent::new(Role::Sourcer, tile(10, 10), FactionId::new());
        let rampart = grid
            .map
            .add_structure(Structure::new(
                StructureKind::Rampart,
                tile(11, 10),
                Some(FactionId::new()),
            ))
            .unwrap();
        assert_eq!(
            clear_forward_obstacle(&mut grid, &agent, Some(Direction::Right)),
            Some(rampart)
        );
    }

    #[test]
    fn only_exempt_structures_means_nothing_happens() {
        let mut grid = Recorder::new();
        let agent = Agent::new(Role::Sourcer, tile(10, 10), FactionId::new());
        grid.map
            .add_structure(Structure::new(StructureKind::Road, tile(10, 11), None))
            .unwrap();
        assert_eq!(
            clear_forward_obstacle(&mut grid, &agent, Some(Direction::Bottom)),
            None
        );
        assert!(grid.said.is_empty());
    }
}
