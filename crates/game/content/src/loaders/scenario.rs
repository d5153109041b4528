//! Scenario loader.
//!
//! Scenarios define which map to use, which factions take part with which
//! standing order, and where each unit starts. This keeps terrain reusable
//! across different unit placements.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{FactionId, Order, Position};

use crate::loaders::{LoadResult, read_file};

/// One unit to spawn: template name and starting tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPlacement(pub String, pub Position);

impl UnitPlacement {
    pub fn template(&self) -> &str {
        &self.0
    }

    pub fn position(&self) -> Position {
        self.1
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionSpec {
    pub id: u8,
    #[serde(default)]
    pub order: Order,
    #[serde(default)]
    pub units: Vec<UnitPlacement>,
}

impl FactionSpec {
    pub fn faction(&self) -> FactionId {
        FactionId(self.id)
    }
}

/// Scenario configuration for battle initialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Map identifier to load
    pub map: String,

    /// Factions in turn order
    pub factions: Vec<FactionSpec>,
}

impl Scenario {
    /// Total number of unit placements across all factions.
    pub fn placement_count(&self) -> usize {
        self.factions.iter().map(|faction| faction.units.len()).sum()
    }
}

/// Loader for scenario files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {}", path.display(), e))
    }

    /// Parses a scenario and rejects duplicate faction ids.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        for (index, faction) in scenario.factions.iter().enumerate() {
            if scenario.factions[..index]
                .iter()
                .any(|earlier| earlier.id == faction.id)
            {
                anyhow::bail!("faction {} is declared more than once", faction.id);
            }
        }
        Ok(scenario)
    }
}
