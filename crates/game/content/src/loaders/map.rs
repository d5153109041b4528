//! Map data loader.
//!
//! Loads pure terrain data from map RON files.
//! Unit placement is handled separately via scenario files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{Grid, GridDimensions, Position, TerrainKind};

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files (terrain only).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    dimensions: (u32, u32),
    #[serde(default)]
    fill: TerrainKind,
    #[serde(default)]
    tiles: Vec<(i32, i32, TerrainKind)>, // (x, y, terrain)
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a grid from a RON file.
    ///
    /// Every tile starts as `fill` (default `Open`); explicitly listed tiles
    /// override it. A listed tile outside the dimensions is an error.
    pub fn load(path: &Path) -> LoadResult<Grid> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("Invalid map {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Grid> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let (width, height) = data.dimensions;
        if width == 0 || height == 0 {
            anyhow::bail!("map dimensions must be non-zero, got {}x{}", width, height);
        }

        let mut grid = Grid::new(GridDimensions::new(width, height), data.fill);
        for (x, y, terrain) in data.tiles {
            grid.set_terrain(Position::new(x, y), terrain)?;
        }
        Ok(grid)
    }
}
