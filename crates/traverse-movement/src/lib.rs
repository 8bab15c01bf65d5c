//! Per-tick movement and local traffic control for agents on the tile grid.
//!
//! This crate contains everything that happens between "the agent wants to be
//! near that tile" and "one direction command was issued this tick". It
//! operates on borrowed agents and a per-tick [`AgentGrid`] and never owns
//! agent state.
//!
//! # Modules
//!
//! - [`clearing`] -- Dismantle a non-exempt structure directly ahead.
//! - [`config`] -- Tunables threaded through planning and stepping ([`MovementConfig`]).
//! - [`context`] -- [`MoveContext`], the bundle of collaborators for one evaluation.
//! - [`error`] -- The fatal movement error class ([`MovementError`]).
//! - [`executor`] -- Fatigue gate, degraded-path fallback and the direction move.
//! - [`grid`] -- The [`AgentGrid`] contract for the shared per-tick grid.
//! - [`planner`] -- Cost-strategy selection and path search.
//! - [`search`] -- Collaborator contracts: path search, cost matrices, direct
//!   approach, visualization.
//! - [`stub`] -- Stub collaborators for demos and tests.
//! - [`threat`] -- Hysteretic reverse-routing flag driven by guard proximity.
//! - [`traffic`] -- Role-priority resolution of tile conflicts.
//! - [`wander`] -- Random and bounded-area wandering.

pub mod clearing;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod grid;
pub mod planner;
pub mod search;
pub mod stub;
pub mod threat;
pub mod traffic;
pub mod wander;

// Re-export primary types at crate root for convenience.
pub use config::MovementConfig;
pub use context::MoveContext;
pub use error::MovementError;
pub use executor::{StepOutcome, StepReport, step, step_detailed};
pub use grid::AgentGrid;
pub use search::{
    CostMatrixProvider, CostStrategy, DirectApproach, PathSearch, SearchGoal, SearchOptions,
    VisualizationError, Visualizer, WeightLookup,
};
pub use traffic::{TrafficAction, TrafficOutcome, TrafficRule, resolve_conflict};
pub use wander::{WanderFilter, WanderReport, WanderWindow, wander, wander_within};
