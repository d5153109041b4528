/// Tactics configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TacticsConfig {
    /// Manhattan radius around a hold anchor within which enemies are engaged.
    pub hold_radius: u32,

    /// Upper bound on engagement rounds an Attack order resolves per turn.
    pub engagement_rounds: u32,
}

impl TacticsConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of terrain entries in a single movement profile.
    pub const MAX_TERRAIN_COSTS: usize = 16;
    /// Axis adjacency: an enemy never has more than four slots to fill.
    pub const MAX_ADJACENT_SLOTS: usize = 4;

    /// Edge cost charged for entering a tile held by a living enemy.
    /// Large enough that no movement range ever pays it.
    pub const BLOCKED_COST: u32 = 1 << 24;
    /// Largest movement or attack range the searches honour; larger values are
    /// clamped. Kept well below [`Self::BLOCKED_COST`].
    pub const MAX_RANGE: u32 = 1 << 12;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HOLD_RADIUS: u32 = 4;
    pub const DEFAULT_ENGAGEMENT_ROUNDS: u32 = 4;

    pub fn new() -> Self {
        Self {
            hold_radius: Self::DEFAULT_HOLD_RADIUS,
            engagement_rounds: Self::DEFAULT_ENGAGEMENT_ROUNDS,
        }
    }

    #[must_use]
    pub fn with_hold_radius(mut self, hold_radius: u32) -> Self {
        self.hold_radius = hold_radius;
        self
    }

    #[must_use]
    pub fn with_engagement_rounds(mut self, engagement_rounds: u32) -> Self {
        self.engagement_rounds = engagement_rounds;
        self
    }
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self::new()
    }
}
