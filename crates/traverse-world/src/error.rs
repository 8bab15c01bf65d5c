//! Error types for the `traverse-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type.

use traverse_types::{AgentId, RegionId, StructureId, Tile};

/// Errors that can occur while building or mutating the grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The region is not part of the grid.
    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    /// A region with the same identifier already exists.
    #[error("duplicate region: {0}")]
    DuplicateRegion(RegionId),

    /// A terrain layout had the wrong shape.
    #[error("terrain layout must be {expected}x{expected}, got row {row} with {width} cells")]
    MalformedTerrain {
        /// Required width and height.
        expected: u8,
        /// Offending row index.
        row: usize,
        /// Width of the offending row.
        width: usize,
    },

    /// Coordinates outside a region.
    #[error("coordinates ({x}, {y}) are outside the region")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
    },

    /// A structure with the same identifier already exists.
    #[error("duplicate structure id: {0}")]
    DuplicateStructure(StructureId),

    /// The agent was already placed in the occupancy view.
    #[error("agent {agent} is already placed at {tile}")]
    AgentAlreadyPlaced {
        /// The agent.
        agent: AgentId,
        /// Where it already stands.
        tile: Tile,
    },
}
