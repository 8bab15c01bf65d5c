//! Core entity structs for the Traverse movement engine.
//!
//! Covers the tile coordinate system, agents and their persisted routing
//! state, structures, hostiles, movement targets and path-search results.

use serde::{Deserialize, Serialize};

use crate::enums::{Direction, HostileKind, Role, StructureKind};
use crate::ids::{AgentId, FactionId, HostileId, StructureId};

/// Width and height of one region, in tiles.
pub const GRID_SIZE: u8 = 50;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// Identifier of one 50x50 region, placed on a world lattice.
///
/// Lattice placement gives tiles in different regions well-defined world
/// coordinates, so ranges and directions work across region boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId {
    /// Lattice column.
    pub rx: i16,
    /// Lattice row.
    pub ry: i16,
}

impl RegionId {
    /// Create a region identifier at lattice position `(rx, ry)`.
    pub const fn new(rx: i16, ry: i16) -> Self {
        Self { rx, ry }
    }
}

impl core::fmt::Display for RegionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "R[{},{}]", self.rx, self.ry)
    }
}

/// One grid cell: local coordinates plus the region it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// The region this tile belongs to.
    pub region: RegionId,
    /// Column within the region, `0..GRID_SIZE`.
    pub x: u8,
    /// Row within the region, `0..GRID_SIZE`.
    pub y: u8,
}

impl Tile {
    /// Create a tile. Returns `None` if `x` or `y` is outside the region.
    pub const fn new(x: u8, y: u8, region: RegionId) -> Option<Self> {
        if x >= GRID_SIZE || y >= GRID_SIZE {
            return None;
        }
        Some(Self { region, x, y })
    }

    /// Build a tile from world coordinates. Returns `None` if the region
    /// would fall outside the lattice.
    pub fn from_world(wx: i32, wy: i32) -> Option<Self> {
        let size = i32::from(GRID_SIZE);
        let rx = i16::try_from(wx.div_euclid(size)).ok()?;
        let ry = i16::try_from(wy.div_euclid(size)).ok()?;
        let x = u8::try_from(wx.rem_euclid(size)).ok()?;
        let y = u8::try_from(wy.rem_euclid(size)).ok()?;
        Self::new(x, y, RegionId::new(rx, ry))
    }

    /// World x coordinate.
    pub fn world_x(&self) -> i32 {
        i32::from(self.region.rx)
            .saturating_mul(i32::from(GRID_SIZE))
            .saturating_add(i32::from(self.x))
    }

    /// World y coordinate.
    pub fn world_y(&self) -> i32 {
        i32::from(self.region.ry)
            .saturating_mul(i32::from(GRID_SIZE))
            .saturating_add(i32::from(self.y))
    }

    /// Chebyshev distance to `other`, diagonal steps counting as one.
    pub fn range_to(&self, other: &Self) -> u32 {
        let dx = other.world_x().abs_diff(self.world_x());
        let dy = other.world_y().abs_diff(self.world_y());
        dx.max(dy)
    }

    /// The compass direction to step toward `other`, or `None` for the same tile.
    ///
    /// Strongly horizontal or vertical offsets (one axis more than twice the
    /// other) produce a straight direction; everything else is diagonal.
    pub fn direction_to(&self, other: &Self) -> Option<Direction> {
        let dx = other.world_x().saturating_sub(self.world_x());
        let dy = other.world_y().saturating_sub(self.world_y());
        let adx = dx.unsigned_abs();
        let ady = dy.unsigned_abs();
        if adx > ady.saturating_mul(2) {
            Direction::from_signs(dx, 0)
        } else if ady > adx.saturating_mul(2) {
            Direction::from_signs(0, dy)
        } else {
            Direction::from_signs(dx, dy)
        }
    }

    /// The neighbouring tile in `direction`, crossing region edges.
    pub fn adjacent(&self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        Self::from_world(
            self.world_x().checked_add(dx)?,
            self.world_y().checked_add(dy)?,
        )
    }

    /// Whether the tile lies within `offset + 1` tiles of the region edge.
    ///
    /// With `offset == 0` the outer ring of the region is border; negative
    /// offsets shrink the border band (`-1` matches nothing inside a region).
    pub fn is_border(&self, offset: i32) -> bool {
        let low = offset.saturating_add(1);
        let high = i32::from(GRID_SIZE).saturating_sub(2).saturating_sub(offset);
        let x = i32::from(self.x);
        let y = i32::from(self.y);
        x < low || x > high || y < low || y > high
    }
}

impl core::fmt::Display for Tile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{} {},{}]", self.region, self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Routing state persisted on the agent record across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingState {
    /// Set while a guard is close; downstream direction choice runs the
    /// route backwards.
    pub reverse: bool,
}

/// A mobile agent on the grid.
///
/// The simulation's registry owns agents; the movement engine only borrows
/// them for one evaluation and writes back the routing fields it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Current position.
    pub tile: Tile,
    /// Job, used for right-of-way.
    pub role: Role,
    /// Owning faction.
    pub faction: FactionId,
    /// Ticks of fatigue left. Any nonzero value blocks movement.
    pub fatigue: u32,
    /// Routing state, absent until first needed.
    pub routing: Option<RoutingState>,
}

impl Agent {
    /// Create a rested agent with no routing state.
    pub fn new(role: Role, tile: Tile, faction: FactionId) -> Self {
        Self {
            id: AgentId::new(),
            tile,
            role,
            faction,
            fatigue: 0,
            routing: None,
        }
    }

    /// The routing state, initialised on first access.
    pub fn routing_mut(&mut self) -> &mut RoutingState {
        self.routing.get_or_insert_with(RoutingState::default)
    }

    /// Whether the agent is currently routing in reverse.
    pub fn is_reversed(&self) -> bool {
        self.routing.is_some_and(|r| r.reverse)
    }
}

// ---------------------------------------------------------------------------
// Static world objects
// ---------------------------------------------------------------------------

/// A built structure occupying a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    /// Unique identifier.
    pub id: StructureId,
    /// Structure kind.
    pub kind: StructureKind,
    /// Position.
    pub tile: Tile,
    /// Owning faction; `None` for neutral structures such as roads.
    pub owner: Option<FactionId>,
}

impl Structure {
    /// Create a structure with a fresh identifier.
    pub fn new(kind: StructureKind, tile: Tile, owner: Option<FactionId>) -> Self {
        Self {
            id: StructureId::new(),
            kind,
            tile,
            owner,
        }
    }

    /// Whether `faction` owns this structure.
    pub fn is_owned_by(&self, faction: FactionId) -> bool {
        self.owner == Some(faction)
    }
}

/// A hostile entity visible on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hostile {
    /// Unique identifier.
    pub id: HostileId,
    /// Hostile kind.
    pub kind: HostileKind,
    /// Position.
    pub tile: Tile,
}

// ---------------------------------------------------------------------------
// Movement targets and path results
// ---------------------------------------------------------------------------

/// Where an agent wants to go: a raw tile or an entity standing on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Target {
    /// A bare tile.
    Tile {
        /// The destination tile.
        tile: Tile,
    },
    /// Another agent.
    Agent {
        /// The agent being approached.
        id: AgentId,
        /// Where it stands.
        tile: Tile,
    },
    /// A structure.
    Structure {
        /// The structure being approached.
        id: StructureId,
        /// Where it stands.
        tile: Tile,
    },
}

impl Target {
    /// The tile this target resolves to.
    pub const fn tile(&self) -> Tile {
        match self {
            Self::Tile { tile } | Self::Agent { tile, .. } | Self::Structure { tile, .. } => *tile,
        }
    }
}

impl From<Tile> for Target {
    fn from(tile: Tile) -> Self {
        Self::Tile { tile }
    }
}

/// Result of one path search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Tiles from the step after the origin toward the target.
    pub path: Vec<Tile>,
    /// Whether the search stopped before reaching the target range.
    pub incomplete: bool,
    /// Total weighted cost of `path`.
    pub cost: u32,
    /// Search operations spent. Diagnostic only.
    pub ops: u32,
}

impl PathResult {
    /// A complete result along `path`.
    pub const fn complete(path: Vec<Tile>, cost: u32) -> Self {
        Self {
            path,
            incomplete: false,
            cost,
            ops: 0,
        }
    }

    /// An incomplete result along `path`.
    pub const fn partial(path: Vec<Tile>, cost: u32) -> Self {
        Self {
            path,
            incomplete: true,
            cost,
            ops: 0,
        }
    }

    /// Whether the result is too short and incomplete to step along.
    pub fn is_degenerate(&self) -> bool {
        self.incomplete && self.path.len() < 2
    }

    /// The next tile to step onto, if any.
    pub fn first_step(&self) -> Option<Tile> {
        self.path.first().copied()
    }
}
