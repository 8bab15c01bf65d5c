//! The scripted demo scenario.
//!
//! One region with a wall line broken by a gap, a swamp patch, a road, a
//! guard and a handful of agents whose goals force every movement path:
//! a swap, an elimination, an obstacle dismantle, on-path wandering and a
//! reverse-routing toggle near the guard.

use std::collections::BTreeMap;

use tracing::info;
use traverse_core::intent::{AgentIntent, IntentSource, MoveIntent};
use traverse_core::tick::SimulationState;
use traverse_types::{
    Agent, AgentId, Direction, FactionId, Hostile, HostileId, HostileKind, RegionId, Role,
    Structure, StructureKind, Target, Terrain, Tile,
};
use traverse_world::{GridMap, RegionState, TerrainGrid, WorldError};

const HOME: RegionId = RegionId::new(0, 0);

fn tile(x: u8, y: u8) -> Result<Tile, WorldError> {
    Tile::new(x, y, HOME).ok_or(WorldError::OutOfBounds {
        x: i32::from(x),
        y: i32::from(y),
    })
}

fn terrain() -> Result<TerrainGrid, WorldError> {
    let mut terrain = TerrainGrid::plain();
    for y in 5..=30u8 {
        if y != 18 {
            terrain.set(20, y, Terrain::Wall)?;
        }
    }
    for x in 30..=35u8 {
        for y in 10..=15u8 {
            terrain.set(x, y, Terrain::Swamp)?;
        }
    }
    Ok(terrain)
}

fn map() -> Result<GridMap, WorldError> {
    let mut map = GridMap::new();
    map.add_region(HOME, RegionState::new(terrain()?))?;

    for x in 5..=15u8 {
        let t = tile(x, 25)?;
        map.add_structure(Structure::new(StructureKind::Road, t, None))?;
        map.mark_path(&t)?;
    }
    map.add_structure(Structure::new(
        StructureKind::ConstructedWall,
        tile(10, 12)?,
        None,
    ))?;
    map.add_hostile(Hostile {
        id: HostileId::new(),
        kind: HostileKind::Guard,
        tile: tile(40, 40)?,
    })?;
    Ok(map)
}

/// What each agent is trying to do.
#[derive(Debug, Clone, Copy)]
enum Goal {
    /// Approach a target, then hold once within range.
    Reach(Target, u32),
    /// Fixed intent every tick.
    Fixed(AgentIntent),
}

/// Intent source for the scenario: agents with a target hold once they are
/// within range of it.
#[derive(Debug, Default)]
pub struct ScenarioIntents {
    goals: BTreeMap<AgentId, Goal>,
}

impl IntentSource for ScenarioIntents {
    fn intent_for(&mut self, _tick: u64, agent: &Agent) -> AgentIntent {
        match self.goals.get(&agent.id) {
            Some(Goal::Reach(target, range)) if agent.tile.range_to(&target.tile()) > *range => {
                AgentIntent::new(MoveIntent::Approach {
                    target: *target,
                    range: *range,
                })
            }
            Some(Goal::Fixed(intent)) => *intent,
            Some(Goal::Reach(..)) | None => AgentIntent::hold(),
        }
    }
}

/// Build the scenario state and its intents.
///
/// # Errors
///
/// Returns [`WorldError`] if the map or the agent placement is invalid.
pub fn build(seed: u64) -> Result<(SimulationState, ScenarioIntents), WorldError> {
    let faction = FactionId::new();
    let mut agents = Vec::new();
    let mut goals = BTreeMap::new();
    let mut add = |role: Role, at: Tile, goal: Goal| {
        let agent = Agent::new(role, at, faction);
        goals.insert(agent.id, goal);
        agents.push(agent);
    };

    // Sourcer heads for the swamp through a carrier parked in its way.
    add(
        Role::Sourcer,
        tile(10, 10)?,
        Goal::Reach(Target::from(tile(30, 12)?), 1),
    );
    add(Role::Carrier, tile(11, 11)?, Goal::Fixed(AgentIntent::hold()));

    // Upgrader walks through a harvester.
    add(
        Role::Upgrader,
        tile(25, 25)?,
        Goal::Reach(Target::from(tile(28, 25)?), 0),
    );
    add(Role::Harvester, tile(26, 25)?, Goal::Fixed(AgentIntent::hold()));

    // Reserver faces the constructed wall.
    add(
        Role::Reserver,
        tile(10, 13)?,
        Goal::Fixed(AgentIntent::hold().heading(Direction::Top)),
    );

    // Generic agent stays on the road.
    add(
        Role::Generic,
        tile(10, 25)?,
        Goal::Fixed(AgentIntent::new(MoveIntent::Wander { on_path: true })),
    );

    // Storage filler idles next to the upgrader spot.
    add(
        Role::StorageFiller,
        tile(28, 27)?,
        Goal::Fixed(AgentIntent::new(MoveIntent::WanderNear {
            goal: tile(28, 27)?,
        })),
    );

    // Defender walks past the guard.
    add(
        Role::MeleeDefender,
        tile(30, 40)?,
        Goal::Reach(Target::from(tile(46, 40)?), 0),
    );

    let map = map()?;
    info!(
        regions = map.region_count(),
        agents = agents.len(),
        "Scenario built"
    );
    let state = SimulationState::new(map, agents, seed)?;
    Ok((state, ScenarioIntents { goals }))
}
