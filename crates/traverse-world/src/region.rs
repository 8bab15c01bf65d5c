//! Runtime state of one region.
//!
//! A [`RegionState`] bundles the natural terrain of a region with the
//! structures built on it, the hostiles currently visible, the set of tiles
//! that lie on known routes, and two flags: whether the region is
//! controlled by a friendly faction and whether its layout is anomalous
//! (misplaced spawn), which forces path search onto the basic cost matrix.

use std::collections::{BTreeMap, BTreeSet};

use traverse_types::{Hostile, Structure, StructureId};

use crate::terrain::TerrainGrid;

/// Mutable runtime state for one region of the grid.
#[derive(Debug, Clone, Default)]
pub struct RegionState {
    /// Natural terrain.
    pub terrain: TerrainGrid,
    /// Structures by `(x, y)`, in insertion order per tile.
    pub structures: BTreeMap<(u8, u8), Vec<Structure>>,
    /// Hostiles visible this tick.
    pub hostiles: Vec<Hostile>,
    /// Tiles lying on a known route through the region.
    pub path_tiles: BTreeSet<(u8, u8)>,
    /// Whether a friendly faction controls this region.
    pub controlled: bool,
    /// Whether the region layout is anomalous and needs the basic cost matrix.
    pub misplaced: bool,
}

impl RegionState {
    /// Create a region with the given terrain and no structures.
    pub fn new(terrain: TerrainGrid) -> Self {
        Self {
            terrain,
            ..Self::default()
        }
    }

    /// Mark the region as controlled.
    #[must_use]
    pub fn controlled(mut self) -> Self {
        self.controlled = true;
        self
    }

    /// Mark the region as anomalous.
    #[must_use]
    pub fn misplaced(mut self) -> Self {
        self.misplaced = true;
        self
    }

    /// Structures standing at `(x, y)`.
    pub fn structures_at(&self, x: u8, y: u8) -> &[Structure] {
        self.structures.get(&(x, y)).map_or(&[], Vec::as_slice)
    }

    /// Whether any structure in the region has the given identifier.
    pub fn contains_structure(&self, id: StructureId) -> bool {
        self.structures
            .values()
            .any(|list| list.iter().any(|s| s.id == id))
    }

    /// Remove a structure by identifier, returning it if present.
    pub fn remove_structure(&mut self, id: StructureId) -> Option<Structure> {
        let mut removed = None;
        for list in self.structures.values_mut() {
            if let Some(pos) = list.iter().position(|s| s.id == id) {
                removed = Some(list.remove(pos));
                break;
            }
        }
        self.structures.retain(|_, list| !list.is_empty());
        removed
    }
}
