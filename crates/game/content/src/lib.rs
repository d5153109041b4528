//! Data-driven content definitions and loaders.
//!
//! This crate reads battle content from RON/TOML data files:
//! - Map layouts (terrain only, RON)
//! - Unit templates (movement profile, ranges, strength, health; RON)
//! - Scenarios (map choice, factions, orders and unit placement; RON)
//! - Tactics configuration (TOML)
//!
//! [`ContentFactory`] ties them together into a ready battlefield plus one
//! order scheduler per faction. All loaders deserialize tactics-core types
//! directly through serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, FactionSpec, LoadResult, MapLoader, MovementSpec, PreparedBattle,
    Scenario, ScenarioLoader, TemplateLoader, TemplateSpec, UnitPlacement,
};
