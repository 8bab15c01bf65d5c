//! The shared per-tick grid contract.
//!
//! Agents are evaluated one after another within a tick, all against the
//! same mutable grid. An [`AgentGrid`] gives an evaluation read access to the
//! static map, mutable access to whichever agent stands on a tile, and the
//! command primitives (move, eliminate, dismantle, say). Commands take effect
//! on the grid immediately: a move commanded on another agent replaces that
//! agent's pending move, and an eliminated agent is gone for every agent
//! evaluated afterwards.

use traverse_types::{Agent, AgentId, Direction, MoveCode, StructureId, Tile};
use traverse_world::GridMap;

/// Mutable view of the grid shared by all evaluations within one tick.
pub trait AgentGrid {
    /// The static map: terrain, structures, hostiles, region flags.
    fn map(&self) -> &GridMap;

    /// Whether any agent stands on `tile`.
    fn is_occupied(&self, tile: &Tile) -> bool;

    /// The first agent standing on `tile`, other than the agent currently
    /// being evaluated.
    fn occupant_mut(&mut self, tile: &Tile) -> Option<&mut Agent>;

    /// Schedule a one-tile move for `agent`, replacing any earlier pending
    /// move this tick.
    fn issue_move(&mut self, agent: AgentId, direction: Direction) -> MoveCode;

    /// Remove `agent` from the grid for good.
    fn eliminate(&mut self, agent: AgentId);

    /// Schedule `agent` to dismantle `structure`.
    fn dismantle(&mut self, agent: AgentId, structure: StructureId);

    /// Emit an observational marker above `agent`.
    fn say(&mut self, agent: AgentId, message: &str);
}
