//! Enumeration types for the Traverse movement engine.
//!
//! Roles are a closed set so the traffic rule table can be matched
//! exhaustively. Directions follow the 1-based compass numbering used by
//! the move-command primitive.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The job an agent performs. Drives right-of-way in tile conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Static miner parked on a resource tile.
    Harvester,
    /// Remote miner travelling to and from distant sources.
    Sourcer,
    /// Claims or reserves controllers in remote regions.
    Reserver,
    /// Works on the region controller from a shared chokepoint.
    Upgrader,
    /// Hauls resources between tiles.
    Carrier,
    /// Keeps storage topped up next to the upgraders.
    StorageFiller,
    /// Close-range defender.
    MeleeDefender,
    /// Any role without special traffic treatment.
    Generic,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Harvester,
        Self::Sourcer,
        Self::Reserver,
        Self::Upgrader,
        Self::Carrier,
        Self::StorageFiller,
        Self::MeleeDefender,
        Self::Generic,
    ];
}

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// One of the eight compass directions, numbered clockwise from 1 (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// y - 1.
    Top = 1,
    /// x + 1, y - 1.
    TopRight = 2,
    /// x + 1.
    Right = 3,
    /// x + 1, y + 1.
    BottomRight = 4,
    /// y + 1.
    Bottom = 5,
    /// x - 1, y + 1.
    BottomLeft = 6,
    /// x - 1.
    Left = 7,
    /// x - 1, y - 1.
    TopLeft = 8,
}

impl Direction {
    /// All directions in clockwise order starting at [`Direction::Top`].
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
        Self::TopLeft,
    ];

    /// Look up a direction by its 1-based number. Returns `None` outside `1..=8`.
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Top),
            2 => Some(Self::TopRight),
            3 => Some(Self::Right),
            4 => Some(Self::BottomRight),
            5 => Some(Self::Bottom),
            6 => Some(Self::BottomLeft),
            7 => Some(Self::Left),
            8 => Some(Self::TopLeft),
            _ => None,
        }
    }

    /// The 1-based compass number.
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Rotate clockwise by `offset` steps: `((d - 1 + offset) mod 8) + 1`.
    pub const fn rotate(self, offset: u8) -> Self {
        match self.number().wrapping_sub(1).wrapping_add(offset % 8) % 8 {
            0 => Self::Top,
            1 => Self::TopRight,
            2 => Self::Right,
            3 => Self::BottomRight,
            4 => Self::Bottom,
            5 => Self::BottomLeft,
            6 => Self::Left,
            _ => Self::TopLeft,
        }
    }

    /// The opposite direction.
    pub const fn reverse(self) -> Self {
        self.rotate(4)
    }

    /// The `(dx, dy)` step for this direction. `y` grows downward.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Top => (0, -1),
            Self::TopRight => (1, -1),
            Self::Right => (1, 0),
            Self::BottomRight => (1, 1),
            Self::Bottom => (0, 1),
            Self::BottomLeft => (-1, 1),
            Self::Left => (-1, 0),
            Self::TopLeft => (-1, -1),
        }
    }

    /// The direction whose offset has the given signs, or `None` for `(0, 0)`.
    pub const fn from_signs(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Some(Self::Top),
            (1, -1) => Some(Self::TopRight),
            (1, 0) => Some(Self::Right),
            (1, 1) => Some(Self::BottomRight),
            (0, 1) => Some(Self::Bottom),
            (-1, 1) => Some(Self::BottomLeft),
            (-1, 0) => Some(Self::Left),
            (-1, -1) => Some(Self::TopLeft),
            _ => None,
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Terrain and structures
// ---------------------------------------------------------------------------

/// Natural terrain of a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// Normal walkable ground.
    #[default]
    Plain,
    /// Walkable but expensive and tiring.
    Swamp,
    /// Impassable natural wall.
    Wall,
}

/// Kind of a built structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Walkable road.
    Road,
    /// Defensive cover; walkable for its owner.
    Rampart,
    /// Agent spawner.
    Spawn,
    /// Player-built wall.
    ConstructedWall,
    /// Energy extension.
    Extension,
    /// Walkable resource container.
    Container,
    /// Defensive tower.
    Tower,
    /// Bulk storage.
    Storage,
    /// Energy link.
    Link,
    /// Laboratory.
    Lab,
    /// Trade terminal.
    Terminal,
    /// Region controller.
    Controller,
}

impl StructureKind {
    /// Whether the structure blocks movement onto its tile.
    ///
    /// Roads and containers are walkable. Ramparts are treated as walkable
    /// here; ownership rules for ramparts are applied by callers that know
    /// the mover's faction.
    pub const fn is_obstacle(self) -> bool {
        !matches!(self, Self::Road | Self::Container | Self::Rampart)
    }
}

/// Kind of hostile entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostileKind {
    /// Stationary guard protecting a resource; the threat the router steers around.
    Guard,
    /// Roaming attacker.
    Raider,
}

// ---------------------------------------------------------------------------
// Move command results
// ---------------------------------------------------------------------------

/// Result code returned by the move-command primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCode {
    /// The move was scheduled.
    Ok,
    /// The agent is still fatigued.
    Tired,
    /// The agent has no body part able to move. Tolerated: the agent still
    /// counts as having moved for this tick.
    NoBodyPart,
    /// The direction or agent was malformed.
    InvalidArgs,
    /// The agent is not controlled by the caller.
    NotOwner,
    /// The agent is still being spawned.
    Busy,
}

impl MoveCode {
    /// Whether the code is acceptable to the movement executor.
    pub const fn is_tolerated(self) -> bool {
        matches!(self, Self::Ok | Self::NoBodyPart)
    }
}
