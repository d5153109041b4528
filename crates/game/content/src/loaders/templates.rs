//! Unit template loader.
//!
//! Templates are spawn-factory inputs keyed by name. A template's movement is
//! either one of the built-in profiles or an explicit terrain cost table.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{MovementKind, MovementProfile, TacticsConfig, TerrainKind, UnitTemplate};

use crate::loaders::{LoadResult, read_file};

/// Movement profile as written in data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementSpec {
    Builtin(MovementKind),
    /// Terrain absent from the list is impassable.
    Custom(Vec<(TerrainKind, u32)>),
}

impl MovementSpec {
    pub fn profile(&self) -> MovementProfile {
        match self {
            MovementSpec::Builtin(kind) => kind.profile(),
            MovementSpec::Custom(costs) => MovementProfile::from_costs(costs.iter().copied()),
        }
    }
}

/// Template entry as written in data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub movement: MovementSpec,
    pub movement_range: u32,
    pub attack_range: u32,
    #[serde(default = "one")]
    pub strength: u32,
    #[serde(default = "one")]
    pub max_health: u32,
}

fn one() -> u32 {
    1
}

impl TemplateSpec {
    pub fn to_template(&self) -> UnitTemplate {
        UnitTemplate::new(self.movement.profile(), self.movement_range, self.attack_range)
            .with_strength(self.strength)
            .with_max_health(self.max_health)
    }
}

/// Loader for the template catalog.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load templates from a RON map of name → template.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, UnitTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid templates {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, UnitTemplate>> {
        let specs: BTreeMap<String, TemplateSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse templates RON: {}", e))?;

        let mut templates = BTreeMap::new();
        for (name, spec) in specs {
            if let MovementSpec::Custom(costs) = &spec.movement {
                if costs.len() > TacticsConfig::MAX_TERRAIN_COSTS {
                    anyhow::bail!(
                        "template '{}' lists {} terrain costs, at most {} are supported",
                        name,
                        costs.len(),
                        TacticsConfig::MAX_TERRAIN_COSTS
                    );
                }
            }
            let longest = spec.movement_range.max(spec.attack_range);
            if longest > TacticsConfig::MAX_RANGE {
                anyhow::bail!(
                    "template '{}' has range {}, at most {} is supported",
                    name,
                    longest,
                    TacticsConfig::MAX_RANGE
                );
            }
            templates.insert(name, spec.to_template());
        }

        tracing::debug!(count = templates.len(), "unit templates loaded");
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "infantry": (
            movement: Builtin(Ground),
            movement_range: 3,
            attack_range: 1,
            strength: 2,
            max_health: 5,
        ),
        "skiff": (
            movement: Custom([(Water, 1), (RoughLow, 3)]),
            movement_range: 4,
            attack_range: 2,
        ),
    }"#;

    #[test]
    fn parses_builtin_and_custom_profiles() {
        let templates = TemplateLoader::parse(CATALOG).expect("valid catalog");
        assert_eq!(templates.len(), 2);

        let infantry = &templates["infantry"];
        assert_eq!(infantry.profile, MovementProfile::ground());
        assert_eq!(infantry.movement_range, 3);
        assert_eq!(infantry.strength, 2);
        assert_eq!(infantry.max_health, 5);

        let skiff = &templates["skiff"];
        assert_eq!(skiff.profile.cost(TerrainKind::Water), Some(1));
        assert_eq!(skiff.profile.cost(TerrainKind::RoughLow), Some(3));
        assert_eq!(skiff.profile.cost(TerrainKind::Open), None);
        assert_eq!(skiff.strength, 1);
        assert_eq!(skiff.max_health, 1);
    }

    #[test]
    fn ranges_above_the_cap_are_rejected() {
        let catalog = format!(
            "{{ \"siege\": (movement: Builtin(Ground), movement_range: 1, attack_range: {}) }}",
            TacticsConfig::MAX_RANGE + 1
        );
        let error = TemplateLoader::parse(&catalog).expect_err("range too large");
        assert!(error.to_string().contains("siege"));
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(TemplateLoader::parse("{ \"x\": (movement_range: 1) }").is_err());
    }
}
