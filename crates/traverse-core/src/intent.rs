//! Intent source trait and a scripted implementation.
//!
//! Each tick, the cycle asks an [`IntentSource`] what every agent wants to
//! do with its movement: approach a target, wander, or hold still. Deciding
//! *where* agents should go is outside this engine; the cycle only turns
//! intents into move commands.

use std::collections::BTreeMap;

use traverse_movement::WanderWindow;
use traverse_types::{Agent, AgentId, Direction, Target, Tile};

/// What an agent wants to do with its movement this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    /// Get within `range` of `target`.
    Approach {
        /// Where to go.
        target: Target,
        /// How close is close enough.
        range: u32,
    },
    /// Step in a random acceptable direction.
    Wander {
        /// Only step onto known routes.
        on_path: bool,
    },
    /// Step in a random acceptable direction within the configured wander
    /// distance of `goal`.
    WanderNear {
        /// The tile to stay close to.
        goal: Tile,
    },
    /// Step in a random acceptable direction inside an explicit window.
    WanderWithin {
        /// The area to stay in.
        window: WanderWindow,
    },
    /// Do not move.
    Hold,
}

/// A movement intent plus the agent's forward direction along its route,
/// when it has one. The forward direction drives obstacle clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentIntent {
    /// The movement intent.
    pub intent: MoveIntent,
    /// Direction the agent is heading along its route.
    pub forward: Option<Direction>,
}

impl AgentIntent {
    /// Intent without a forward direction.
    pub const fn new(intent: MoveIntent) -> Self {
        Self {
            intent,
            forward: None,
        }
    }

    /// Attach a forward direction.
    #[must_use]
    pub const fn heading(mut self, forward: Direction) -> Self {
        self.forward = Some(forward);
        self
    }

    /// An agent that stays put.
    pub const fn hold() -> Self {
        Self::new(MoveIntent::Hold)
    }
}

/// A source of movement intents.
pub trait IntentSource {
    /// The intent of `agent` for tick `tick`.
    fn intent_for(&mut self, tick: u64, agent: &Agent) -> AgentIntent;
}

/// Fixed intents per agent, with a fallback for agents not listed.
#[derive(Debug, Clone)]
pub struct ScriptedIntents {
    intents: BTreeMap<AgentId, AgentIntent>,
    fallback: AgentIntent,
}

impl ScriptedIntents {
    /// A source where every agent holds.
    pub fn new() -> Self {
        Self {
            intents: BTreeMap::new(),
            fallback: AgentIntent::hold(),
        }
    }

    /// Set the intent for agents without one of their own.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: AgentIntent) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the intent of one agent, replacing any earlier one.
    pub fn set(&mut self, agent: AgentId, intent: AgentIntent) {
        self.intents.insert(agent, intent);
    }

    /// Builder form of [`ScriptedIntents::set`].
    #[must_use]
    pub fn with(mut self, agent: AgentId, intent: AgentIntent) -> Self {
        self.set(agent, intent);
        self
    }
}

impl Default for ScriptedIntents {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentSource for ScriptedIntents {
    fn intent_for(&mut self, _tick: u64, agent: &Agent) -> AgentIntent {
        self.intents.get(&agent.id).copied().unwrap_or(self.fallback)
    }
}
