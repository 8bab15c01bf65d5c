//! Natural terrain of one region.
//!
//! A [`TerrainGrid`] stores one [`Terrain`] value per tile in row-major order.
//! Layouts can be built from text rows for fixtures: `#` is a wall, `~` a
//! swamp, anything else plain.

use serde::{Deserialize, Serialize};
use traverse_types::{GRID_SIZE, Terrain};

use crate::error::WorldError;

/// Number of tiles in one region.
pub const TILE_COUNT: usize = GRID_SIZE as usize * GRID_SIZE as usize;

/// Row-major terrain for a single region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainGrid {
    cells: Vec<Terrain>,
}

impl TerrainGrid {
    /// A region of plain terrain.
    pub fn plain() -> Self {
        Self {
            cells: vec![Terrain::Plain; TILE_COUNT],
        }
    }

    /// Parse a layout of exactly `GRID_SIZE` rows of `GRID_SIZE` characters.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MalformedTerrain`] if the layout has the wrong
    /// number of rows or a row has the wrong width.
    pub fn from_rows(rows: &[&str]) -> Result<Self, WorldError> {
        let expected = usize::from(GRID_SIZE);
        if rows.len() != expected {
            return Err(WorldError::MalformedTerrain {
                expected: GRID_SIZE,
                row: rows.len(),
                width: 0,
            });
        }
        let mut cells = Vec::with_capacity(TILE_COUNT);
        for (row, line) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != expected {
                return Err(WorldError::MalformedTerrain {
                    expected: GRID_SIZE,
                    row,
                    width,
                });
            }
            cells.extend(line.chars().map(|c| match c {
                '#' => Terrain::Wall,
                '~' => Terrain::Swamp,
                _ => Terrain::Plain,
            }));
        }
        Ok(Self { cells })
    }

    /// Terrain at `(x, y)`. Out-of-range coordinates read as walls.
    pub fn get(&self, x: u8, y: u8) -> Terrain {
        index(x, y)
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or(Terrain::Wall)
    }

    /// Overwrite the terrain at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if the coordinates are outside the region.
    pub fn set(&mut self, x: u8, y: u8, terrain: Terrain) -> Result<(), WorldError> {
        let cell = index(x, y)
            .and_then(|i| self.cells.get_mut(i))
            .ok_or(WorldError::OutOfBounds {
                x: i32::from(x),
                y: i32::from(y),
            })?;
        *cell = terrain;
        Ok(())
    }

    /// Count tiles of the given terrain.
    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }
}

impl Default for TerrainGrid {
    fn default() -> Self {
        Self::plain()
    }
}

/// Row-major index of `(x, y)`, or `None` outside the region.
pub(crate) fn index(x: u8, y: u8) -> Option<usize> {
    if x >= GRID_SIZE || y >= GRID_SIZE {
        return None;
    }
    // Both coordinates are below GRID_SIZE, so this stays under TILE_COUNT.
    #[allow(clippy::arithmetic_side_effects)]
    let i = usize::from(y) * usize::from(GRID_SIZE) + usize::from(x);
    Some(i)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn layout_with(x: usize, y: usize, c: char) -> Vec<String> {
        (0..usize::from(GRID_SIZE))
            .map(|row| {
                (0..usize::from(GRID_SIZE))
                    .map(|col| if row == y && col == x { c } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn plain_grid_has_no_walls() {
        let grid = TerrainGrid::plain();
        assert_eq!(grid.count(Terrain::Wall), 0);
        assert_eq!(grid.get(49, 49), Terrain::Plain);
    }

    #[test]
    fn out_of_range_reads_as_wall() {
        assert_eq!(TerrainGrid::plain().get(50, 0), Terrain::Wall);
    }

    #[test]
    fn parses_rows() {
        let rows = layout_with(3, 7, '#');
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let grid = TerrainGrid::from_rows(&refs).unwrap();
        assert_eq!(grid.get(3, 7), Terrain::Wall);
        assert_eq!(grid.get(7, 3), Terrain::Plain);
        assert_eq!(grid.count(Terrain::Wall), 1);
    }

    #[test]
    fn rejects_short_layout() {
        let err = TerrainGrid::from_rows(&["...."]).unwrap_err();
        assert!(matches!(err, WorldError::MalformedTerrain { .. }));
    }

    #[test]
    fn set_updates_cell() {
        let mut grid = TerrainGrid::plain();
        grid.set(10, 11, Terrain::Swamp).unwrap();
        assert_eq!(grid.get(10, 11), Terrain::Swamp);
        assert!(grid.set(60, 0, Terrain::Wall).is_err());
    }
}
