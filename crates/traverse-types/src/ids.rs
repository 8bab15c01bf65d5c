//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity on the grid has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. IDs use UUID v7 (time-ordered), so
//! the default registry order is creation order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Build an identifier from a fixed integer, for fixtures and replays.
            pub const fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a mobile agent on the grid.
    AgentId
}

define_id! {
    /// Unique identifier for a built structure.
    StructureId
}

define_id! {
    /// Unique identifier for a hostile entity (guards, raiders).
    HostileId
}

define_id! {
    /// Unique identifier for a faction; structures and agents sharing a
    /// faction are "own" to each other.
    FactionId
}
