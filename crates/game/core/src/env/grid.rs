use crate::error::{ErrorSeverity, TacticsError};
use crate::state::{Direction, Position};

/// Errors raised at the grid boundary.
///
/// A structurally inconsistent grid is the only fatal input the tactical core
/// recognises; it surfaces here rather than deep inside a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("position {position} is outside a {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    #[error("terrain buffer holds {actual} tiles, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

impl TacticsError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            GridError::OutOfBounds { .. } => ErrorSeverity::Validation,
            GridError::SizeMismatch { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GridError::OutOfBounds { .. } => "GRID_OUT_OF_BOUNDS",
            GridError::SizeMismatch { .. } => "GRID_SIZE_MISMATCH",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }
}

/// Canonical terrain classes. `Custom` leaves room for scenario-specific
/// terrain that only some movement profiles know how to cross.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    #[default]
    Open,
    RoughLow,
    RoughHigh,
    Water,
    Hill,
    Wall,
    Custom(u16),
}

/// A single tile as seen by the search: where it is and what it is made of.
///
/// Occupancy is not part of the tile. Units refer to tiles by position and the
/// battlefield answers occupancy questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub position: Position,
    pub terrain: TerrainKind,
}

/// Immutable-per-turn terrain layout stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    dimensions: GridDimensions,
    terrain: Vec<TerrainKind>,
}

impl Grid {
    /// Creates a grid where every tile has the `fill` terrain.
    pub fn new(dimensions: GridDimensions, fill: TerrainKind) -> Self {
        Self {
            dimensions,
            terrain: vec![fill; dimensions.area()],
        }
    }

    /// Builds a grid from a row-major terrain buffer.
    pub fn from_tiles(
        dimensions: GridDimensions,
        terrain: Vec<TerrainKind>,
    ) -> Result<Self, GridError> {
        if terrain.len() != dimensions.area() {
            return Err(GridError::SizeMismatch {
                expected: dimensions.area(),
                actual: terrain.len(),
            });
        }
        Ok(Self {
            dimensions,
            terrain,
        })
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    pub fn set_terrain(&mut self, position: Position, terrain: TerrainKind) -> Result<(), GridError> {
        let index = self
            .dimensions
            .index(position)
            .ok_or(GridError::OutOfBounds {
                position,
                width: self.dimensions.width,
                height: self.dimensions.height,
            })?;
        self.terrain[index] = terrain;
        Ok(())
    }

    pub fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.dimensions
            .index(position)
            .map(|index| self.terrain[index])
    }

    pub fn tile_at(&self, position: Position) -> Option<Tile> {
        self.terrain(position).map(|terrain| Tile { position, terrain })
    }

    /// Axis-adjacent in-bounds neighbours in [`Direction::SCAN_ORDER`].
    /// Edge tiles simply have fewer of them.
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::SCAN_ORDER
            .into_iter()
            .map(move |direction| position.step(direction))
            .filter(|neighbor| self.contains(*neighbor))
    }

    /// Every position on the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.dimensions.width as i32;
        let height = self.dimensions.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}
