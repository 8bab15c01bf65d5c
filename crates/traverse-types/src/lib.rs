//! Shared type definitions for the Traverse movement engine.
//!
//! This crate is the single source of truth for the data model shared by the
//! grid, movement and tick-cycle crates.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents, structures, hostiles and factions
//! - [`enums`] -- Roles, compass directions, terrain, structure kinds, move codes
//! - [`structs`] -- Tiles, agents, routing state, structures and path results

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Direction, HostileKind, MoveCode, Role, StructureKind, Terrain};
pub use ids::{AgentId, FactionId, HostileId, StructureId};
pub use structs::{
    Agent, GRID_SIZE, Hostile, PathResult, RegionId, RoutingState, Structure, Target, Tile,
};
