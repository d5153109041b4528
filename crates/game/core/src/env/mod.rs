//! Read-only battle environment: terrain layout and movement rules.
//!
//! The grid is immutable for the duration of a turn; movement profiles are
//! plain data copied into every unit.
mod grid;
mod profile;

pub use grid::{Grid, GridDimensions, GridError, TerrainKind, Tile};
pub use profile::{MovementKind, MovementProfile};
