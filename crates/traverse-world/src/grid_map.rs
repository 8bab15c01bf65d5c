//! The grid: regions by identifier plus the terrain classifier queries.
//!
//! [`GridMap`] answers the questions every movement component asks about a
//! tile: is it a wall, does a structure block it, is it on a known route,
//! which guard is closest. Tiles in regions that are not part of the map
//! read as walls.

use std::collections::BTreeMap;

use traverse_types::{Hostile, HostileKind, RegionId, Structure, StructureId, Terrain, Tile};

use crate::error::WorldError;
use crate::region::RegionState;

/// How a tile looks to an agent considering stepping onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileClass {
    /// Within the border band of its region.
    Border,
    /// Natural wall, or a region outside the map.
    Wall,
    /// Blocked by an obstacle structure.
    Obstacle,
    /// Walkable.
    Open,
}

/// All regions of the grid.
#[derive(Debug, Clone, Default)]
pub struct GridMap {
    regions: BTreeMap<RegionId, RegionState>,
}

impl GridMap {
    /// Create an empty grid.
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    // -------------------------------------------------------------------
    // Regions
    // -------------------------------------------------------------------

    /// Add a region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateRegion`] if the region already exists.
    pub fn add_region(&mut self, id: RegionId, state: RegionState) -> Result<(), WorldError> {
        if self.regions.contains_key(&id) {
            return Err(WorldError::DuplicateRegion(id));
        }
        self.regions.insert(id, state);
        Ok(())
    }

    /// Immutable access to a region.
    pub fn region(&self, id: RegionId) -> Option<&RegionState> {
        self.regions.get(&id)
    }

    /// Number of regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Whether a friendly faction controls `region`.
    pub fn is_controlled(&self, region: RegionId) -> bool {
        self.regions.get(&region).is_some_and(|r| r.controlled)
    }

    /// Whether `region` is flagged anomalous.
    pub fn is_misplaced(&self, region: RegionId) -> bool {
        self.regions.get(&region).is_some_and(|r| r.misplaced)
    }

    // -------------------------------------------------------------------
    // Terrain classifier
    // -------------------------------------------------------------------

    /// Natural terrain of `tile`. Unknown regions read as walls.
    pub fn terrain_at(&self, tile: &Tile) -> Terrain {
        self.regions
            .get(&tile.region)
            .map_or(Terrain::Wall, |r| r.terrain.get(tile.x, tile.y))
    }

    /// Whether `tile` is impassable terrain.
    pub fn is_wall(&self, tile: &Tile) -> bool {
        self.terrain_at(tile) == Terrain::Wall
    }

    /// Structures standing on `tile`.
    pub fn structures_at(&self, tile: &Tile) -> &[Structure] {
        self.regions
            .get(&tile.region)
            .map_or(&[], |r| r.structures_at(tile.x, tile.y))
    }

    /// Whether an obstacle structure stands on `tile`.
    pub fn has_obstacle_structure(&self, tile: &Tile) -> bool {
        self.structures_at(tile).iter().any(|s| s.kind.is_obstacle())
    }

    /// Whether `tile` lies on a known route.
    pub fn in_path(&self, tile: &Tile) -> bool {
        self.regions
            .get(&tile.region)
            .is_some_and(|r| r.path_tiles.contains(&(tile.x, tile.y)))
    }

    /// Classify `tile` for movement, checking border, wall and obstacle in
    /// that order.
    pub fn classify(&self, tile: &Tile, border_offset: i32) -> TileClass {
        if tile.is_border(border_offset) {
            TileClass::Border
        } else if self.is_wall(tile) {
            TileClass::Wall
        } else if self.has_obstacle_structure(tile) {
            TileClass::Obstacle
        } else {
            TileClass::Open
        }
    }

    // -------------------------------------------------------------------
    // Structures and routes
    // -------------------------------------------------------------------

    /// Add a structure to its region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if the structure's region is
    /// not on the grid, or [`WorldError::DuplicateStructure`] if the id is
    /// already used in that region.
    pub fn add_structure(&mut self, structure: Structure) -> Result<StructureId, WorldError> {
        let region = self
            .regions
            .get_mut(&structure.tile.region)
            .ok_or(WorldError::RegionNotFound(structure.tile.region))?;
        if region.contains_structure(structure.id) {
            return Err(WorldError::DuplicateStructure(structure.id));
        }
        let id = structure.id;
        region
            .structures
            .entry((structure.tile.x, structure.tile.y))
            .or_default()
            .push(structure);
        Ok(id)
    }

    /// Look up a structure by identifier.
    pub fn find_structure(&self, id: StructureId) -> Option<&Structure> {
        self.regions
            .values()
            .flat_map(|r| r.structures.values())
            .flatten()
            .find(|s| s.id == id)
    }

    /// Remove a structure, returning it if it existed.
    pub fn remove_structure(&mut self, id: StructureId) -> Option<Structure> {
        self.regions
            .values_mut()
            .find_map(|r| r.remove_structure(id))
    }

    /// Record `tile` as lying on a known route.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if the tile's region is unknown.
    pub fn mark_path(&mut self, tile: &Tile) -> Result<(), WorldError> {
        let region = self
            .regions
            .get_mut(&tile.region)
            .ok_or(WorldError::RegionNotFound(tile.region))?;
        region.path_tiles.insert((tile.x, tile.y));
        Ok(())
    }

    // -------------------------------------------------------------------
    // Hostiles
    // -------------------------------------------------------------------

    /// Add a hostile to its region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] if the hostile's region is unknown.
    pub fn add_hostile(&mut self, hostile: Hostile) -> Result<(), WorldError> {
        let region = self
            .regions
            .get_mut(&hostile.tile.region)
            .ok_or(WorldError::RegionNotFound(hostile.tile.region))?;
        region.hostiles.push(hostile);
        Ok(())
    }

    /// The guard in `tile`'s region closest to `tile`. Ties go to the guard
    /// listed first.
    pub fn nearest_guard(&self, tile: &Tile) -> Option<&Hostile> {
        let region = self.regions.get(&tile.region)?;
        let mut best: Option<(&Hostile, u32)> = None;
        for hostile in region.hostiles.iter().filter(|h| h.kind == HostileKind::Guard) {
            let range = tile.range_to(&hostile.tile);
            if best.is_none_or(|(_, r)| range < r) {
                best = Some((hostile, range));
            }
        }
        best.map(|(h, _)| h)
    }
}
