//! Content loaders for reading battle data from files.
//!
//! Each loader turns one RON/TOML file into tactics-core values; the
//! [`ContentFactory`] knows where those files live inside a data directory.

pub mod config;
pub mod factory;
pub mod map;
pub mod scenario;
pub mod templates;

pub use config::ConfigLoader;
pub use factory::{ContentFactory, PreparedBattle};
pub use map::MapLoader;
pub use scenario::{FactionSpec, Scenario, ScenarioLoader, UnitPlacement};
pub use templates::{MovementSpec, TemplateLoader, TemplateSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
