//! Tick cycle: evaluate every agent's movement in order, then commit.
//!
//! Each tick runs through these phases:
//!
//! 1. **Advance** -- bump the tick counter and open a [`TickFrame`] over the
//!    map holding the whole agent registry.
//!
//! 2. **Evaluation** -- for each agent in [`TickOrder`]: fetch its intent,
//!    update its reverse-routing flag, clear an obstacle ahead, then step,
//!    wander or hold. Resolver actions on other agents (yield, elimination)
//!    are visible to every agent evaluated afterwards.
//!
//! 3. **Commit** -- land pending moves, apply fatigue and recovery.
//!
//! 4. **Upkeep** -- destroy dismantled structures.
//!
//! The cycle is deterministic given the same initial state, seed, order and
//! intent source outputs.

use std::collections::{BTreeMap, BTreeSet};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};
use traverse_movement::clearing::clear_forward_obstacle;
use traverse_movement::threat::update_reverse_flag;
use traverse_movement::{
    CostMatrixProvider, DirectApproach, MoveContext, MovementError, PathSearch, StepReport,
    Visualizer, WanderReport, WanderWindow, step_detailed, wander, wander_within,
};
use traverse_types::{Agent, AgentId, StructureId};
use traverse_world::{GridMap, OccupancyView, WorldError};

use crate::config::SimulationConfig;
use crate::frame::{BlockedMove, MoveRecord, TickFrame};
use crate::intent::{AgentIntent, IntentSource, MoveIntent};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A grid operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The tick counter cannot advance any further.
    #[error("tick counter overflowed")]
    TickOverflow,
}

/// The order agents are evaluated in within a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TickOrder {
    /// Ascending agent id.
    #[default]
    Registry,
    /// The listed agents first, then everyone else by ascending id. Unknown
    /// and repeated ids are skipped.
    Explicit(Vec<AgentId>),
}

impl TickOrder {
    /// The evaluation sequence for `agents`.
    pub fn resolve(&self, agents: &BTreeMap<AgentId, Agent>) -> Vec<AgentId> {
        match self {
            Self::Registry => agents.keys().copied().collect(),
            Self::Explicit(ids) => {
                let mut seen = BTreeSet::new();
                ids.iter()
                    .chain(agents.keys())
                    .copied()
                    .filter(|id| agents.contains_key(id) && seen.insert(*id))
                    .collect()
            }
        }
    }
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// The last tick executed; `0` before the first.
    pub tick: u64,
    /// Terrain, structures, hostiles and region flags.
    pub map: GridMap,
    /// The agent registry.
    pub agents: BTreeMap<AgentId, Agent>,
    /// Source of wander headings.
    pub rng: SmallRng,
}

impl SimulationState {
    /// Build a state from a map and its agents, seeding the wander RNG.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if an agent stands in a region
    /// that is not on the map, or [`WorldError::AgentAlreadyPlaced`] if an
    /// agent id appears twice.
    pub fn new(map: GridMap, agents: Vec<Agent>, seed: u64) -> Result<Self, WorldError> {
        if let Some(stray) = agents.iter().find(|a| map.region(a.tile.region).is_none()) {
            return Err(WorldError::RegionNotFound(stray.tile.region));
        }
        OccupancyView::from_agents(&agents)?;
        Ok(Self {
            tick: 0,
            map,
            agents: agents.into_iter().map(|a| (a.id, a)).collect(),
            rng: SmallRng::seed_from_u64(seed),
        })
    }
}

/// The external collaborators used for every evaluation in a tick.
pub struct Collaborators<'a> {
    /// The path-search primitive.
    pub search: &'a dyn PathSearch,
    /// The terrain-weight source.
    pub costs: &'a dyn CostMatrixProvider,
    /// The fallback stepper for degenerate searches.
    pub approach: &'a mut dyn DirectApproach,
    /// Optional display sink for search results.
    pub visualizer: Option<&'a dyn Visualizer>,
}

impl core::fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collaborators")
            .field("visualizer", &self.visualizer.is_some())
            .finish_non_exhaustive()
    }
}

/// What one agent did during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentOutcome {
    /// The executor ran toward a target.
    Stepped(StepReport),
    /// The agent wandered.
    Wandered(WanderReport),
    /// The agent held position.
    Held,
    /// The executor failed; the error is in [`TickSummary::errors`].
    Failed,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Agents in the order they were evaluated.
    pub evaluated: Vec<AgentId>,
    /// What each evaluated agent did.
    pub outcomes: BTreeMap<AgentId, AgentOutcome>,
    /// Movement errors, per agent.
    pub errors: BTreeMap<AgentId, MovementError>,
    /// Moves that landed.
    pub landed: Vec<MoveRecord>,
    /// Moves that did not land.
    pub blocked: Vec<BlockedMove>,
    /// Agents eliminated by the traffic resolver.
    pub eliminated: Vec<AgentId>,
    /// Structures destroyed.
    pub dismantled: Vec<StructureId>,
    /// Markers emitted by agents.
    pub markers: Vec<(AgentId, String)>,
}

/// Execute one complete tick.
///
/// A failed step is recorded in [`TickSummary::errors`] and does not stop
/// evaluation of the remaining agents.
///
/// # Errors
///
/// Returns [`TickError::TickOverflow`] if the tick counter is exhausted, or
/// [`TickError::World`] if the occupancy index cannot be built.
pub fn run_tick(
    state: &mut SimulationState,
    config: &SimulationConfig,
    order: &TickOrder,
    intents: &mut dyn IntentSource,
    collaborators: &mut Collaborators<'_>,
) -> Result<TickSummary, TickError> {
    // --- Phase 1: Advance ---
    let tick = state.tick.checked_add(1).ok_or(TickError::TickOverflow)?;
    let movement = config.movement();
    let evaluated = order.resolve(&state.agents);
    let map = &state.map;
    let mut frame = TickFrame::new(map, std::mem::take(&mut state.agents))?;
    state.tick = tick;
    info!(tick, agents = evaluated.len(), "Tick started");

    // --- Phase 2: Evaluation ---
    let mut outcomes = BTreeMap::new();
    let mut errors = BTreeMap::new();

    for &id in &evaluated {
        let Some(mut agent) = frame.take(id) else {
            debug!(tick, agent = %id, "Agent eliminated earlier this tick, skipping");
            continue;
        };

        let AgentIntent { intent, forward } = intents.intent_for(tick, &agent);
        update_reverse_flag(&mut agent, map, &movement);
        clear_forward_obstacle(&mut frame, &agent, forward);

        let outcome = match intent {
            MoveIntent::Approach { target, range } => {
                let mut ctx = MoveContext {
                    config: &movement,
                    search: collaborators.search,
                    costs: collaborators.costs,
                    approach: &mut *collaborators.approach,
                    visualizer: collaborators.visualizer,
                };
                match step_detailed(&mut ctx, &mut frame, &agent, &target, range) {
                    Ok(report) => AgentOutcome::Stepped(report),
                    Err(e) => {
                        warn!(tick, agent = %id, error = %e, "Movement failed");
                        errors.insert(id, e);
                        AgentOutcome::Failed
                    }
                }
            }
            MoveIntent::Wander { on_path } => AgentOutcome::Wandered(wander(
                &mut frame,
                &agent,
                on_path,
                movement.border_offset,
                &mut state.rng,
            )),
            MoveIntent::WanderNear { goal } => AgentOutcome::Wandered(wander_within(
                &mut frame,
                &agent,
                &WanderWindow::new(goal).with_distance(movement.wander_distance),
                movement.border_offset,
                &mut state.rng,
            )),
            MoveIntent::WanderWithin { window } => AgentOutcome::Wandered(wander_within(
                &mut frame,
                &agent,
                &window,
                movement.border_offset,
                &mut state.rng,
            )),
            MoveIntent::Hold => AgentOutcome::Held,
        };

        outcomes.insert(id, outcome);
        frame.restore(agent);
    }

    // --- Phase 3: Commit ---
    let (agents, report) = frame.commit(&config.fatigue);
    state.agents = agents;

    // --- Phase 4: Upkeep ---
    let mut dismantled = Vec::new();
    for (agent, structure) in &report.dismantles {
        if let Some(removed) = state.map.remove_structure(*structure) {
            debug!(tick, %agent, structure = %removed.id, kind = ?removed.kind, "Structure destroyed");
            dismantled.push(removed.id);
        }
    }

    info!(
        tick,
        landed = report.landed.len(),
        blocked = report.blocked.len(),
        eliminated = report.eliminated.len(),
        dismantled = dismantled.len(),
        errors = errors.len(),
        "Tick completed"
    );

    Ok(TickSummary {
        tick,
        evaluated,
        outcomes,
        errors,
        landed: report.landed,
        blocked: report.blocked,
        eliminated: report.eliminated,
        dismantled,
        markers: report.markers,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use traverse_movement::StepOutcome;
    use traverse_movement::clearing::DISMANTLE_MARKER;
    use traverse_movement::stub::{GreedyApproach, StraightLineSearch, StructureCosts};
    use traverse_types::{
        Direction, FactionId, RegionId, Role, Structure, StructureKind, Target, Tile,
    };
    use traverse_world::{RegionState, TerrainGrid};

    use super::*;
    use crate::intent::ScriptedIntents;

    fn tile(x: u8, y: u8) -> Tile {
        Tile::new(x, y, RegionId::new(0, 0)).unwrap()
    }

    fn map() -> GridMap {
        let mut map = GridMap::new();
        map.add_region(RegionId::new(0, 0), RegionState::new(TerrainGrid::plain()))
            .unwrap();
        map
    }

    fn agent(id: u128, role: Role, at: Tile, faction: FactionId) -> Agent {
        Agent {
            id: AgentId::from_u128(id),
            ..Agent::new(role, at, faction)
        }
    }

    fn approach(x: u8, y: u8) -> AgentIntent {
        AgentIntent::new(MoveIntent::Approach {
            target: Target::from(tile(x, y)),
            range: 0,
        })
    }

    fn run(
        state: &mut SimulationState,
        order: &TickOrder,
        intents: &mut ScriptedIntents,
    ) -> TickSummary {
        let config = SimulationConfig::default();
        let search = StraightLineSearch::new();
        let mut greedy = GreedyApproach;
        let mut collaborators = Collaborators {
            search: &search,
            costs: &StructureCosts,
            approach: &mut greedy,
            visualizer: None,
        };
        run_tick(state, &config, order, intents, &mut collaborators).unwrap()
    }

    #[test]
    fn explicit_order_lists_first_then_registry() {
        let faction = FactionId::new();
        let agents: BTreeMap<AgentId, Agent> = (1..=3)
            .map(|i| agent(i, Role::Carrier, tile(10, 10), faction))
            .map(|a| (a.id, a))
            .collect();
        let [a, b, c] = [1, 2, 3].map(AgentId::from_u128);

        assert_eq!(TickOrder::Registry.resolve(&agents), vec![a, b, c]);
        let order = TickOrder::Explicit(vec![c, AgentId::from_u128(99), c, a]);
        assert_eq!(order.resolve(&agents), vec![c, a, b]);
    }

    #[test]
    fn state_rejects_agents_outside_the_map() {
        let stray = Agent::new(
            Role::Carrier,
            Tile::new(10, 10, RegionId::new(5, 5)).unwrap(),
            FactionId::new(),
        );
        let err = SimulationState::new(map(), vec![stray], 1).unwrap_err();
        assert!(matches!(err, WorldError::RegionNotFound(_)));
    }

    #[test]
    fn approach_moves_one_tile_and_advances_tick() {
        let faction = FactionId::new();
        let a = agent(1, Role::Carrier, tile(10, 10), faction);
        let mut state = SimulationState::new(map(), vec![a.clone()], 7).unwrap();
        let mut intents = ScriptedIntents::new().with(a.id, approach(15, 10));

        let summary = run(&mut state, &TickOrder::Registry, &mut intents);
        assert_eq!(summary.tick, 1);
        assert_eq!(state.tick, 1);
        assert_eq!(state.agents[&a.id].tile, tile(11, 10));
        assert!(matches!(
            summary.outcomes[&a.id],
            AgentOutcome::Stepped(StepReport {
                outcome: StepOutcome::Moved {
                    direction: Direction::Right,
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn movement_error_is_recorded_and_others_continue() {
        let faction = FactionId::new();
        let a = agent(1, Role::Carrier, tile(10, 10), faction);
        let b = agent(2, Role::Carrier, tile(20, 20), faction);
        let mut state = SimulationState::new(map(), vec![a.clone(), b.clone()], 7).unwrap();
        let mut intents = ScriptedIntents::new()
            .with(a.id, approach(10, 10))
            .with(b.id, approach(20, 25));

        let summary = run(&mut state, &TickOrder::Registry, &mut intents);
        assert!(matches!(
            summary.errors.get(&a.id),
            Some(MovementError::NoDirection { .. })
        ));
        assert_eq!(summary.outcomes[&a.id], AgentOutcome::Failed);
        assert_eq!(state.agents[&b.id].tile, tile(20, 21));
    }

    #[test]
    fn upgrader_eliminates_harvester_in_its_way() {
        let faction = FactionId::new();
        let upgrader = agent(1, Role::Upgrader, tile(10, 10), faction);
        let harvester = agent(2, Role::Harvester, tile(11, 10), faction);
        let mut state =
            SimulationState::new(map(), vec![upgrader.clone(), harvester.clone()], 7).unwrap();
        let mut intents = ScriptedIntents::new().with(upgrader.id, approach(15, 10));

        let summary = run(&mut state, &TickOrder::Registry, &mut intents);
        assert_eq!(summary.eliminated, vec![harvester.id]);
        assert!(!state.agents.contains_key(&harvester.id));
        assert!(!summary.outcomes.contains_key(&harvester.id));
        assert_eq!(state.agents[&upgrader.id].tile, tile(11, 10));
    }

    #[test]
    fn sourcer_swaps_with_carrier() {
        let faction = FactionId::new();
        let sourcer = agent(1, Role::Sourcer, tile(10, 10), faction);
        let carrier = agent(2, Role::Carrier, tile(11, 10), faction);
        let mut state =
            SimulationState::new(map(), vec![sourcer.clone(), carrier.clone()], 7).unwrap();
        let mut intents = ScriptedIntents::new().with(sourcer.id, approach(15, 10));

        let summary = run(&mut state, &TickOrder::Registry, &mut intents);
        assert_eq!(state.agents[&sourcer.id].tile, tile(11, 10));
        assert_eq!(state.agents[&carrier.id].tile, tile(10, 10));
        assert_eq!(summary.landed.len(), 2);
        assert!(state.agents[&carrier.id].routing.is_some());
    }

    #[test]
    fn forward_obstacle_is_dismantled_at_end_of_tick() {
        let faction = FactionId::new();
        let mut map = map();
        let wall = map
            .add_structure(Structure::new(
                StructureKind::ConstructedWall,
                tile(10, 9),
                None,
            ))
            .unwrap();
        let a = agent(1, Role::Sourcer, tile(10, 10), faction);
        let mut state = SimulationState::new(map, vec![a.clone()], 7).unwrap();
        let mut intents =
            ScriptedIntents::new().with(a.id, AgentIntent::hold().heading(Direction::Top));

        let summary = run(&mut state, &TickOrder::Registry, &mut intents);
        assert_eq!(summary.dismantled, vec![wall]);
        assert_eq!(summary.markers, vec![(a.id, DISMANTLE_MARKER.to_owned())]);
        assert!(state.map.find_structure(wall).is_none());
        assert_eq!(summary.outcomes[&a.id], AgentOutcome::Held);
    }

    #[test]
    fn wander_uses_the_seeded_rng() {
        let faction = FactionId::new();
        let a = agent(1, Role::Carrier, tile(25, 25), faction);
        let fresh = || SimulationState::new(map(), vec![a.clone()], 99).unwrap();
        let mut intents = ScriptedIntents::new()
            .with_fallback(AgentIntent::new(MoveIntent::Wander { on_path: false }));

        let mut first = fresh();
        let mut second = fresh();
        for _ in 0..5 {
            let one = run(&mut first, &TickOrder::Registry, &mut intents);
            let two = run(&mut second, &TickOrder::Registry, &mut intents);
            assert_eq!(one, two);
        }
        assert_eq!(first.agents, second.agents);
    }
}
