//! Error types for the traverse-movement crate.
//!
//! Only one class of failure is fatal to an agent's tick: the move-command
//! primitive rejecting a direction move. Degraded searches, unresolved
//! conflicts and exhausted wanders are ordinary outcomes and are reported
//! through return values and logs instead.

use traverse_types::{AgentId, MoveCode, Tile};

/// Fatal movement errors. Abort the agent's action for this tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovementError {
    /// The move command returned a code other than `Ok` or `NoBodyPart`.
    #[error("move of agent {agent} from {position} toward {destination} rejected with {code:?}")]
    MoveRejected {
        /// The agent that tried to move.
        agent: AgentId,
        /// Where it stood.
        position: Tile,
        /// Where it tried to go.
        destination: Tile,
        /// The code returned by the move command.
        code: MoveCode,
    },

    /// No direction leads from the agent's tile to the destination.
    #[error("agent {agent} at {position} has no direction toward {destination}")]
    NoDirection {
        /// The agent that tried to move.
        agent: AgentId,
        /// Where it stood.
        position: Tile,
        /// The unreachable destination (the agent's own tile).
        destination: Tile,
    },
}
