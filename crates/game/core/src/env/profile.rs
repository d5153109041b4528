use arrayvec::ArrayVec;

use crate::config::TacticsConfig;
use crate::env::TerrainKind;

type CostTable = ArrayVec<(TerrainKind, u32), { TacticsConfig::MAX_TERRAIN_COSTS }>;

/// Built-in locomotion families.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MovementKind {
    #[default]
    Ground,
    Water,
    Air,
}

impl MovementKind {
    pub fn profile(self) -> MovementProfile {
        match self {
            MovementKind::Ground => MovementProfile::ground(),
            MovementKind::Water => MovementProfile::water(),
            MovementKind::Air => MovementProfile::air(),
        }
    }
}

/// Traversal cost per terrain class.
///
/// A terrain without an entry is impassable for the owner of the profile.
/// Profiles are plain values: every unit carries its own copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementProfile {
    costs: CostTable,
}

impl MovementProfile {
    /// A profile that cannot enter any terrain.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a profile from `(terrain, cost)` pairs. Later duplicates
    /// overwrite earlier ones; entries beyond capacity are dropped with a
    /// warning and those terrains stay impassable.
    pub fn from_costs<I>(costs: I) -> Self
    where
        I: IntoIterator<Item = (TerrainKind, u32)>,
    {
        costs
            .into_iter()
            .fold(Self::empty(), |profile, (terrain, cost)| {
                profile.with_cost(terrain, cost)
            })
    }

    pub fn ground() -> Self {
        Self::from_costs([
            (TerrainKind::Open, 1),
            (TerrainKind::RoughLow, 2),
            (TerrainKind::RoughHigh, 3),
            (TerrainKind::Hill, 2),
        ])
    }

    pub fn water() -> Self {
        Self::from_costs([(TerrainKind::Water, 1)])
    }

    pub fn air() -> Self {
        Self::from_costs([
            (TerrainKind::Open, 1),
            (TerrainKind::RoughLow, 1),
            (TerrainKind::RoughHigh, 1),
            (TerrainKind::Water, 1),
            (TerrainKind::Hill, 1),
        ])
    }

    /// Sets the cost of entering `terrain` (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, terrain: TerrainKind, cost: u32) -> Self {
        if let Some(entry) = self.costs.iter_mut().find(|(kind, _)| *kind == terrain) {
            entry.1 = cost;
        } else if self.costs.try_push((terrain, cost)).is_err() {
            tracing::warn!(
                %terrain,
                cost,
                capacity = TacticsConfig::MAX_TERRAIN_COSTS,
                "movement profile full, terrain stays impassable"
            );
        }
        self
    }

    /// Marks `terrain` impassable (builder pattern).
    #[must_use]
    pub fn without(mut self, terrain: TerrainKind) -> Self {
        self.costs.retain(|(kind, _)| *kind != terrain);
        self
    }

    /// Cost of entering a tile of `terrain`, or `None` when impassable.
    pub fn cost(&self, terrain: TerrainKind) -> Option<u32> {
        self.costs
            .iter()
            .find(|(kind, _)| *kind == terrain)
            .map(|(_, cost)| *cost)
    }

    pub fn is_passable(&self, terrain: TerrainKind) -> bool {
        self.cost(terrain).is_some()
    }

    pub fn entries(&self) -> impl Iterator<Item = (TerrainKind, u32)> + '_ {
        self.costs.iter().copied()
    }
}
