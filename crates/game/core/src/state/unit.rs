use crate::env::MovementProfile;
use crate::search::CostField;

use super::{FactionId, Position, ResourceMeter, UnitId};

bitflags::bitflags! {
    /// Per-turn action budget. Both flags are restored when the unit's faction
    /// turn begins and cleared as the unit spends them.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActionBudget: u8 {
        const MOVE = 0b01;
        const ACT = 0b10;
    }
}

impl Default for ActionBudget {
    fn default() -> Self {
        Self::all()
    }
}

/// Spawn blueprint. Every unit built from a template receives its own copy of
/// the movement profile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub profile: MovementProfile,
    pub movement_range: u32,
    pub attack_range: u32,
    pub strength: u32,
    pub max_health: u32,
}

impl UnitTemplate {
    pub fn new(profile: MovementProfile, movement_range: u32, attack_range: u32) -> Self {
        Self {
            profile,
            movement_range,
            attack_range,
            strength: 1,
            max_health: 1,
        }
    }

    #[must_use]
    pub fn with_strength(mut self, strength: u32) -> Self {
        self.strength = strength;
        self
    }

    #[must_use]
    pub fn with_max_health(mut self, max_health: u32) -> Self {
        self.max_health = max_health.max(1);
        self
    }
}

/// A squad member on the battlefield.
///
/// The unit refers to its tile by position; tiles never own units.
///
/// # Invariants
///
/// - `field`, when present, was computed from the current `position` during the
///   current turn. Moving drops it, and so does the death of any unit hostile
///   to this one.
/// - A dead unit holds no tile in the battlefield occupancy map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub faction: FactionId,
    pub position: Position,
    pub profile: MovementProfile,
    pub movement_range: u32,
    pub attack_range: u32,
    pub strength: u32,
    pub health: ResourceMeter,
    pub budget: ActionBudget,
    alive: bool,

    #[cfg_attr(feature = "serde", serde(skip))]
    field: Option<CostField>,
}

impl Unit {
    pub fn new(id: UnitId, faction: FactionId, position: Position, template: &UnitTemplate) -> Self {
        Self {
            id,
            faction,
            position,
            profile: template.profile.clone(),
            movement_range: template.movement_range,
            attack_range: template.attack_range,
            strength: template.strength,
            health: ResourceMeter::full(template.max_health),
            budget: ActionBudget::all(),
            alive: true,
            field: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn can_move(&self) -> bool {
        self.alive && self.budget.contains(ActionBudget::MOVE)
    }

    pub fn can_act(&self) -> bool {
        self.alive && self.budget.contains(ActionBudget::ACT)
    }

    pub fn has_budget(&self) -> bool {
        self.alive && !self.budget.is_empty()
    }

    pub fn is_hostile_to(&self, other: &Unit) -> bool {
        self.faction != other.faction
    }

    pub(crate) fn reset_budget(&mut self) {
        self.budget = ActionBudget::all();
        self.field = None;
    }

    pub(crate) fn consume(&mut self, spent: ActionBudget) {
        self.budget.remove(spent);
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
        self.budget = ActionBudget::empty();
        self.field = None;
    }

    /// Relocates the unit and drops its cost field, so a stale field is never
    /// read after the position changes.
    pub(crate) fn relocate(&mut self, position: Position) {
        self.position = position;
        self.field = None;
    }

    /// Cached cost field for `turn`, if it is still valid.
    pub(crate) fn field(&self, turn: u64) -> Option<&CostField> {
        self.field
            .as_ref()
            .filter(|field| field.turn() == turn && field.origin() == self.position)
    }

    pub(crate) fn store_field(&mut self, field: CostField) {
        self.field = Some(field);
    }

    pub(crate) fn forget_field(&mut self) {
        self.field = None;
    }

    pub fn has_cached_field(&self) -> bool {
        self.field.is_some()
    }
}
