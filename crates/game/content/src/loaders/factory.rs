//! Content factory for assembling battles from data files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tactics_core::{Battlefield, Grid, OrderScheduler, TacticsConfig, UnitTemplate};

use crate::loaders::{
    ConfigLoader, LoadResult, MapLoader, Scenario, ScenarioLoader, TemplateLoader,
};

/// Everything a skirmish needs to start.
#[derive(Debug)]
pub struct PreparedBattle {
    pub battlefield: Battlefield,
    /// One scheduler per scenario faction, in scenario order.
    pub schedulers: Vec<OrderScheduler>,
    pub config: TacticsConfig,
}

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml          (optional)
/// ├── templates.ron
/// ├── maps/
/// │   └── crossing.ron
/// └── scenarios/
///     └── crossing.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load tactics configuration from `config.toml`, or defaults when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<TacticsConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(TacticsConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the unit template catalog from `templates.ron`.
    pub fn load_templates(&self) -> LoadResult<BTreeMap<String, UnitTemplate>> {
        let path = self.data_dir.join("templates.ron");
        TemplateLoader::load(&path)
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<Grid> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Loads the scenario with its map, templates and configuration, spawns
    /// every unit and creates one scheduler per faction.
    pub fn build_scenario(&self, name: &str) -> LoadResult<PreparedBattle> {
        let config = self.load_config()?;
        let templates = self.load_templates()?;
        let scenario = self.load_scenario(name)?;
        let grid = self.load_map(&scenario.map)?;

        let mut battlefield = Battlefield::new(grid);
        let mut schedulers = Vec::with_capacity(scenario.factions.len());

        for spec in &scenario.factions {
            let faction = spec.faction();
            battlefield.add_faction(faction);
            for placement in &spec.units {
                let template = templates.get(placement.template()).ok_or_else(|| {
                    anyhow::anyhow!(
                        "scenario '{}' places unknown template '{}' for {}",
                        name,
                        placement.template(),
                        faction
                    )
                })?;
                battlefield
                    .spawn(faction, template, placement.position())
                    .map_err(|e| {
                        anyhow::anyhow!(
                            "scenario '{}' cannot place '{}' for {}: {}",
                            name,
                            placement.template(),
                            faction,
                            e
                        )
                    })?;
            }
            schedulers.push(OrderScheduler::new(faction, spec.order));
        }

        tracing::info!(
            scenario = name,
            map = %scenario.map,
            factions = schedulers.len(),
            units = scenario.placement_count(),
            "scenario assembled"
        );
        Ok(PreparedBattle {
            battlefield,
            schedulers,
            config,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
