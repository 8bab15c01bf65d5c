//! Terrain-weight overrides consumed by path search.
//!
//! A [`CostMatrix`] holds one byte per tile. `0` means "use the terrain
//! default" (plain or swamp cost), [`CostMatrix::IMPASSABLE`] blocks the tile,
//! and anything in between replaces the terrain cost outright.

use serde::{Deserialize, Serialize};
use traverse_types::Tile;

use crate::terrain::{TILE_COUNT, index};

/// Per-region weight overrides for path search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostMatrix {
    weights: Vec<u8>,
}

impl CostMatrix {
    /// Weight that makes a tile unwalkable.
    pub const IMPASSABLE: u8 = u8::MAX;

    /// A matrix with no overrides.
    pub fn new() -> Self {
        Self {
            weights: vec![0; TILE_COUNT],
        }
    }

    /// Weight override at `(x, y)`; `0` when unset or out of range.
    pub fn get(&self, x: u8, y: u8) -> u8 {
        index(x, y)
            .and_then(|i| self.weights.get(i).copied())
            .unwrap_or(0)
    }

    /// Set the weight override at `(x, y)`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u8, y: u8, weight: u8) {
        if let Some(cell) = index(x, y).and_then(|i| self.weights.get_mut(i)) {
            *cell = weight;
        }
    }

    /// Mark a tile as unwalkable.
    pub fn block(&mut self, tile: &Tile) {
        self.set(tile.x, tile.y, Self::IMPASSABLE);
    }

    /// Whether the tile is blocked by this matrix.
    pub fn is_blocked(&self, tile: &Tile) -> bool {
        self.get(tile.x, tile.y) == Self::IMPASSABLE
    }
}

impl Default for CostMatrix {
    fn default() -> Self {
        Self::new()
    }
}
