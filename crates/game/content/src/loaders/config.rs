//! Tactics configuration loader.

use std::path::Path;

use tactics_core::TacticsConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for tactics configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<TacticsConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<TacticsConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("hold_radius = 6\n").expect("valid toml");
        assert_eq!(config.hold_radius, 6);
        assert_eq!(
            config.engagement_rounds,
            TacticsConfig::DEFAULT_ENGAGEMENT_ROUNDS
        );
        assert_eq!(ConfigLoader::parse("").expect("empty toml"), TacticsConfig::default());
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ConfigLoader::parse("hold_radius = \"far\"\n").is_err());
    }
}
