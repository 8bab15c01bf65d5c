//! The per-tick mutable frame and the end-of-tick commit.
//!
//! A [`TickFrame`] owns the agent registry for the duration of one tick and
//! implements [`AgentGrid`] for the movement crate. The agent being evaluated
//! is taken out of the registry while it runs, so the resolver can borrow
//! any other occupant mutably at the same time.
//!
//! Commands are recorded, not applied: moves become pending and land in
//! [`TickFrame::commit`], in the order they were first issued. Eliminations
//! are the exception and take effect at once.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;
use traverse_movement::AgentGrid;
use traverse_types::{
    Agent, AgentId, Direction, FactionId, MoveCode, StructureId, StructureKind, Terrain, Tile,
};
use traverse_world::{GridMap, OccupancyView, WorldError};

use crate::config::FatigueConfig;

/// A move issued this tick and not yet committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    /// The agent to move.
    pub agent: AgentId,
    /// The commanded direction.
    pub direction: Direction,
}

/// A move that landed at commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    /// The agent that moved.
    pub agent: AgentId,
    /// Where it stood.
    pub from: Tile,
    /// Where it stands now.
    pub to: Tile,
}

/// Why a pending move did not land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// The destination lies beyond the edge of the world.
    OffGrid,
    /// Wall, obstacle structure, foreign rampart, or unknown region.
    Impassable,
    /// Another agent stayed on the destination.
    Occupied,
}

/// A move that did not land at commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedMove {
    /// The agent that tried to move.
    pub agent: AgentId,
    /// Where it stays.
    pub at: Tile,
    /// The commanded direction.
    pub direction: Direction,
    /// Why it stays.
    pub reason: BlockReason,
}

/// Everything the commit did, apart from the updated registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Moves that landed, in commit order.
    pub landed: Vec<MoveRecord>,
    /// Moves that did not land.
    pub blocked: Vec<BlockedMove>,
    /// Agents removed by the traffic resolver.
    pub eliminated: Vec<AgentId>,
    /// Dismantle commands, in issue order.
    pub dismantles: Vec<(AgentId, StructureId)>,
    /// Markers emitted by agents, in issue order.
    pub markers: Vec<(AgentId, String)>,
}

/// The agent currently out of the registry for evaluation.
#[derive(Debug, Clone, Copy)]
struct Evaluating {
    id: AgentId,
    fatigue: u32,
}

/// Mutable state shared by every evaluation within one tick.
#[derive(Debug)]
pub struct TickFrame<'w> {
    map: &'w GridMap,
    agents: BTreeMap<AgentId, Agent>,
    occupancy: OccupancyView,
    evaluating: Option<Evaluating>,
    pending: Vec<PendingMove>,
    eliminated: Vec<AgentId>,
    dismantles: Vec<(AgentId, StructureId)>,
    markers: Vec<(AgentId, String)>,
}

impl<'w> TickFrame<'w> {
    /// Open a frame over `map` holding `agents`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentAlreadyPlaced`] if the occupancy index
    /// cannot be built.
    pub fn new(map: &'w GridMap, agents: BTreeMap<AgentId, Agent>) -> Result<Self, WorldError> {
        let occupancy = OccupancyView::from_agents(agents.values())?;
        Ok(Self {
            map,
            agents,
            occupancy,
            evaluating: None,
            pending: Vec::new(),
            eliminated: Vec::new(),
            dismantles: Vec::new(),
            markers: Vec::new(),
        })
    }

    /// Take `id` out of the registry for evaluation. Returns `None` if the
    /// agent has been eliminated.
    ///
    /// The agent keeps its place in the occupancy index, and commands it
    /// issues on itself are accepted. Hand it back with
    /// [`TickFrame::restore`].
    pub fn take(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        self.evaluating = Some(Evaluating {
            id,
            fatigue: agent.fatigue,
        });
        Some(agent)
    }

    /// Return an evaluated agent to the registry.
    pub fn restore(&mut self, agent: Agent) {
        if self.evaluating.is_some_and(|e| e.id == agent.id) {
            self.evaluating = None;
        }
        self.agents.insert(agent.id, agent);
    }

    /// Look up an agent still in the registry.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// The pending move of `agent`, if it has one.
    pub fn pending_move(&self, agent: AgentId) -> Option<Direction> {
        self.pending
            .iter()
            .find(|p| p.agent == agent)
            .map(|p| p.direction)
    }

    fn fatigue_of(&self, agent: AgentId) -> Option<u32> {
        match self.evaluating {
            Some(e) if e.id == agent => Some(e.fatigue),
            _ => self.agents.get(&agent).map(|a| a.fatigue),
        }
    }

    /// Apply every pending move, then fatigue recovery.
    ///
    /// Moves are processed in the order they were first issued. A move lands
    /// when its destination is passable for the mover and either empty or
    /// held by a single agent whose own pending move leads onto the mover's
    /// tile, in which case both land as a swap. A move onto a tile whose
    /// occupant still has a pending move waits at the back of the queue until
    /// that move is settled, so a follower can step into a tile its leader
    /// vacates regardless of evaluation order. When every remaining move is
    /// waiting on another (a rotation), the move at the front is blocked.
    /// A landed move adds terrain
    /// fatigue. Every surviving agent then recovers
    /// [`FatigueConfig::fatigue_recovery`].
    ///
    /// Dismantles are reported, not applied; the map is borrowed for the
    /// whole tick.
    pub fn commit(self, fatigue: &FatigueConfig) -> (BTreeMap<AgentId, Agent>, CommitReport) {
        let Self {
            map,
            mut agents,
            mut occupancy,
            pending,
            eliminated,
            dismantles,
            markers,
            ..
        } = self;

        let mut report = CommitReport {
            eliminated,
            dismantles,
            markers,
            ..CommitReport::default()
        };
        let mut queue: VecDeque<PendingMove> = pending.into();
        // Deferrals since the queue last shrank.
        let mut stalled = 0usize;

        while let Some(mv) = queue.pop_front() {
            let deferrals = std::mem::take(&mut stalled);
            let Some(from) = occupancy.position(mv.agent) else {
                continue;
            };
            let Some(faction) = agents.get(&mv.agent).map(|a| a.faction) else {
                continue;
            };
            let blocked = |reason| BlockedMove {
                agent: mv.agent,
                at: from,
                direction: mv.direction,
                reason,
            };

            let Some(to) = from.adjacent(mv.direction) else {
                report.blocked.push(blocked(BlockReason::OffGrid));
                continue;
            };
            if !is_passable(map, &to, faction) {
                report.blocked.push(blocked(BlockReason::Impassable));
                continue;
            }

            let occupants = occupancy.occupants(&to).to_vec();
            match occupants.as_slice() {
                [] => {
                    land(map, &mut agents, &mut occupancy, fatigue, mv.agent, from, to, &mut report);
                }
                [other] => {
                    let partner = queue.iter().position(|p| {
                        p.agent == *other && to.adjacent(p.direction) == Some(from)
                    });
                    match partner.and_then(|i| queue.remove(i)) {
                        Some(swap) => {
                            debug!(agent = %mv.agent, other = %swap.agent, %from, %to, "Swap");
                            land(map, &mut agents, &mut occupancy, fatigue, mv.agent, from, to, &mut report);
                            land(map, &mut agents, &mut occupancy, fatigue, swap.agent, to, from, &mut report);
                        }
                        None if deferrals <= queue.len()
                            && queue.iter().any(|p| p.agent == *other) =>
                        {
                            // The occupant may still leave; retry after its move.
                            stalled = deferrals.saturating_add(1);
                            queue.push_back(mv);
                        }
                        None => report.blocked.push(blocked(BlockReason::Occupied)),
                    }
                }
                _ => report.blocked.push(blocked(BlockReason::Occupied)),
            }
        }

        for agent in agents.values_mut() {
            agent.fatigue = agent.fatigue.saturating_sub(fatigue.fatigue_recovery);
        }

        (agents, report)
    }
}

/// Whether an agent of `faction` may stand on `tile`.
fn is_passable(map: &GridMap, tile: &Tile, faction: FactionId) -> bool {
    !map.is_wall(tile)
        && !map.structures_at(tile).iter().any(|s| {
            s.kind.is_obstacle() || (s.kind == StructureKind::Rampart && !s.is_owned_by(faction))
        })
}

#[allow(clippy::too_many_arguments)]
fn land(
    map: &GridMap,
    agents: &mut BTreeMap<AgentId, Agent>,
    occupancy: &mut OccupancyView,
    fatigue: &FatigueConfig,
    id: AgentId,
    from: Tile,
    to: Tile,
    report: &mut CommitReport,
) {
    occupancy.relocate(id, to);
    if let Some(agent) = agents.get_mut(&id) {
        let cost = match map.terrain_at(&to) {
            Terrain::Swamp => fatigue.swamp_fatigue,
            Terrain::Plain | Terrain::Wall => fatigue.plain_fatigue,
        };
        agent.tile = to;
        agent.fatigue = agent.fatigue.saturating_add(cost);
    }
    report.landed.push(MoveRecord {
        agent: id,
        from,
        to,
    });
}

impl AgentGrid for TickFrame<'_> {
    fn map(&self) -> &GridMap {
        self.map
    }

    fn is_occupied(&self, tile: &Tile) -> bool {
        self.occupancy.is_occupied(tile)
    }

    fn occupant_mut(&mut self, tile: &Tile) -> Option<&mut Agent> {
        let agents = &self.agents;
        let id = self
            .occupancy
            .occupants(tile)
            .iter()
            .copied()
            .find(|id| agents.contains_key(id))?;
        self.agents.get_mut(&id)
    }

    fn issue_move(&mut self, agent: AgentId, direction: Direction) -> MoveCode {
        let Some(fatigue) = self.fatigue_of(agent) else {
            return MoveCode::InvalidArgs;
        };
        if fatigue > 0 {
            return MoveCode::Tired;
        }
        match self.pending.iter_mut().find(|p| p.agent == agent) {
            Some(existing) => existing.direction = direction,
            None => self.pending.push(PendingMove { agent, direction }),
        }
        MoveCode::Ok
    }

    fn eliminate(&mut self, agent: AgentId) {
        if self.agents.remove(&agent).is_none() {
            return;
        }
        self.occupancy.remove(agent);
        self.pending.retain(|p| p.agent != agent);
        self.eliminated.push(agent);
    }

    fn dismantle(&mut self, agent: AgentId, structure: StructureId) {
        self.dismantles.push((agent, structure));
    }

    fn say(&mut self, agent: AgentId, message: &str) {
        self.markers.push((agent, message.to_owned()));
    }
}
