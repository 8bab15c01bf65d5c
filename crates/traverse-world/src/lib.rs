//! Terrain, structures, hostiles and occupancy for the Traverse movement engine.
//!
//! This crate models the static and per-tick state of the grid that the
//! movement engine reads: which tiles are walls or swamps, which structures
//! block a tile, where guards stand, which regions are controlled, and which
//! agents occupy which tiles this tick.
//!
//! # Modules
//!
//! - [`cost_matrix`] -- Per-region terrain-weight overrides consumed by path search.
//! - [`error`] -- Error types for grid construction.
//! - [`grid_map`] -- [`GridMap`], the terrain classifier and structure index.
//! - [`occupancy`] -- [`OccupancyView`], the transient tile-to-agents index.
//! - [`region`] -- [`RegionState`], one region's terrain, structures and flags.
//! - [`terrain`] -- [`TerrainGrid`], the natural terrain of one region.

pub mod cost_matrix;
pub mod error;
pub mod grid_map;
pub mod occupancy;
pub mod region;
pub mod terrain;

// Re-export primary types at crate root.
pub use cost_matrix::CostMatrix;
pub use error::WorldError;
pub use grid_map::{GridMap, TileClass};
pub use occupancy::OccupancyView;
pub use region::RegionState;
pub use terrain::TerrainGrid;
