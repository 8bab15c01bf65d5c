//! Transient tile-to-agents index.
//!
//! An [`OccupancyView`] is rebuilt at the start of every tick from the agent
//! registry and kept current while agents are evaluated: eliminations remove
//! an agent immediately and committed moves relocate it. It is never
//! persisted.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use traverse_types::{Agent, AgentId, Tile};

use crate::error::WorldError;

/// Agents present on one tile, in arrival order.
pub type Occupants = SmallVec<[AgentId; 2]>;

/// Per-tick mapping from tile to the agents standing on it.
#[derive(Debug, Clone, Default)]
pub struct OccupancyView {
    tiles: BTreeMap<Tile, Occupants>,
    positions: BTreeMap<AgentId, Tile>,
}

impl OccupancyView {
    /// Create an empty view.
    pub const fn new() -> Self {
        Self {
            tiles: BTreeMap::new(),
            positions: BTreeMap::new(),
        }
    }

    /// Build a view from the agents' current tiles.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentAlreadyPlaced`] if an agent appears twice.
    pub fn from_agents<'a>(agents: impl IntoIterator<Item = &'a Agent>) -> Result<Self, WorldError> {
        let mut view = Self::new();
        for agent in agents {
            view.place(agent.id, agent.tile)?;
        }
        Ok(view)
    }

    /// Place an agent on a tile.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentAlreadyPlaced`] if the agent is already in the view.
    pub fn place(&mut self, agent: AgentId, tile: Tile) -> Result<(), WorldError> {
        if let Some(&existing) = self.positions.get(&agent) {
            return Err(WorldError::AgentAlreadyPlaced {
                agent,
                tile: existing,
            });
        }
        self.positions.insert(agent, tile);
        self.tiles.entry(tile).or_default().push(agent);
        Ok(())
    }

    /// Remove an agent, returning the tile it stood on.
    pub fn remove(&mut self, agent: AgentId) -> Option<Tile> {
        let tile = self.positions.remove(&agent)?;
        if let Some(list) = self.tiles.get_mut(&tile) {
            list.retain(|a| *a != agent);
            if list.is_empty() {
                self.tiles.remove(&tile);
            }
        }
        Some(tile)
    }

    /// Move an agent to `to`. Returns `false` if the agent is not in the view.
    pub fn relocate(&mut self, agent: AgentId, to: Tile) -> bool {
        if self.remove(agent).is_none() {
            return false;
        }
        self.positions.insert(agent, to);
        self.tiles.entry(to).or_default().push(agent);
        true
    }

    /// Agents standing on `tile`.
    pub fn occupants(&self, tile: &Tile) -> &[AgentId] {
        self.tiles.get(tile).map_or(&[], |list| list.as_slice())
    }

    /// The first agent to have arrived on `tile`.
    pub fn first_occupant(&self, tile: &Tile) -> Option<AgentId> {
        self.occupants(tile).first().copied()
    }

    /// Whether any agent stands on `tile`.
    pub fn is_occupied(&self, tile: &Tile) -> bool {
        !self.occupants(tile).is_empty()
    }

    /// Where `agent` stands, if it is in the view.
    pub fn position(&self, agent: AgentId) -> Option<Tile> {
        self.positions.get(&agent).copied()
    }

    /// Number of agents in the view.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
