//! The battlefield: grid, rosters and occupancy for a single battle.
//!
//! All mutation of units happens through [`Battlefield`] on the thread that
//! runs the current faction turn. Query methods that need a unit's cost field
//! take `&mut self` because the field is computed lazily and cached on the
//! unit until it moves or the next turn starts.
mod combat;
mod events;
mod movement;

use std::collections::BTreeMap;

pub use combat::{AttackError, AttackOutcome, CombatResolver, StrengthCombat};
pub use events::{NullSink, PresentationSink, RecordingSink, TacticalEvent};
pub use movement::MoveError;

use crate::env::Grid;
use crate::error::{ErrorSeverity, TacticsError};
use crate::state::{FactionId, Position, Roster, Unit, UnitId, UnitTemplate};

/// External collaborators invoked by committing operations.
pub struct TurnEnv<'a> {
    pub combat: &'a mut dyn CombatResolver,
    pub sink: &'a mut dyn PresentationSink,
}

impl<'a> TurnEnv<'a> {
    pub fn new(combat: &'a mut dyn CombatResolver, sink: &'a mut dyn PresentationSink) -> Self {
        Self { combat, sink }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnError {
    #[error("spawn position {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("spawn position {position} is already held by unit {occupant}")]
    Occupied { position: Position, occupant: UnitId },

    #[error("unit profile cannot stand on the terrain at {0}")]
    Impassable(Position),
}

impl TacticsError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            SpawnError::OutOfBounds(_) => "SPAWN_OUT_OF_BOUNDS",
            SpawnError::Occupied { .. } => "SPAWN_OCCUPIED",
            SpawnError::Impassable(_) => "SPAWN_IMPASSABLE",
        }
    }
}

/// Aggregate battle state.
///
/// # Invariants
///
/// - `occupancy` maps exactly the positions of living units to their ids.
/// - A unit id appears in exactly one roster.
#[derive(Clone, Debug)]
pub struct Battlefield {
    grid: Grid,
    rosters: BTreeMap<FactionId, Roster>,
    occupancy: BTreeMap<Position, UnitId>,
    turn: u64,
    next_id: u32,
}

impl Battlefield {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            rosters: BTreeMap::new(),
            occupancy: BTreeMap::new(),
            turn: 0,
            next_id: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Monotonic counter advanced at the start of every faction turn.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Registers an empty roster so the faction takes part in turn order even
    /// before any of its units spawn.
    pub fn add_faction(&mut self, faction: FactionId) -> &mut Roster {
        self.rosters
            .entry(faction)
            .or_insert_with(|| Roster::new(faction))
    }

    /// Spawn factory: places a fresh unit built from `template`.
    pub fn spawn(
        &mut self,
        faction: FactionId,
        template: &UnitTemplate,
        position: Position,
    ) -> Result<UnitId, SpawnError> {
        let terrain = self
            .grid
            .terrain(position)
            .ok_or(SpawnError::OutOfBounds(position))?;
        if let Some(&occupant) = self.occupancy.get(&position) {
            return Err(SpawnError::Occupied { position, occupant });
        }
        if !template.profile.is_passable(terrain) {
            return Err(SpawnError::Impassable(position));
        }

        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.occupancy.insert(position, id);
        self.add_faction(faction)
            .add(Unit::new(id, faction, position, template));

        tracing::debug!(unit = %id, %faction, %position, "unit spawned");
        Ok(id)
    }

    /// Factions in ascending id order.
    pub fn factions(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.rosters.keys().copied()
    }

    pub fn roster(&self, faction: FactionId) -> Option<&Roster> {
        self.rosters.get(&faction)
    }

    pub fn roster_mut(&mut self, faction: FactionId) -> Option<&mut Roster> {
        self.rosters.get_mut(&faction)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.rosters.values().find_map(|roster| roster.get(id))
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.rosters.values_mut().find_map(|roster| roster.get_mut(id))
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.unit(id).is_some_and(Unit::is_alive)
    }

    /// Living unit standing on `position`, if any.
    pub fn occupant(&self, position: Position) -> Option<&Unit> {
        self.occupancy
            .get(&position)
            .and_then(|&id| self.unit(id))
            .filter(|unit| unit.is_alive())
    }

    /// Whether a living unit hostile to `faction` stands on `position`.
    pub fn is_hostile_at(&self, position: Position, faction: FactionId) -> bool {
        self.occupant(position)
            .is_some_and(|unit| unit.faction != faction)
    }

    /// Living units of every faction other than `faction`, in faction order
    /// then roster order.
    pub fn enemies_of(&self, faction: FactionId) -> Vec<UnitId> {
        self.rosters
            .values()
            .filter(|roster| roster.faction() != faction)
            .flat_map(|roster| roster.living().map(|unit| unit.id))
            .collect()
    }

    pub fn living_units(&self, faction: FactionId) -> Vec<UnitId> {
        self.roster(faction)
            .map(Roster::living_ids)
            .unwrap_or_default()
    }

    /// Factions that still field at least one living unit.
    pub fn standing_factions(&self) -> Vec<FactionId> {
        self.rosters
            .values()
            .filter(|roster| roster.living_count() > 0)
            .map(Roster::faction)
            .collect()
    }

    /// Starts `faction`'s turn: restores both budgets of its living units and
    /// drops their cost fields.
    pub fn begin_faction_turn(&mut self, faction: FactionId) {
        self.turn += 1;
        if let Some(roster) = self.rosters.get_mut(&faction) {
            for unit in roster.units_mut().filter(|unit| unit.is_alive()) {
                unit.reset_budget();
            }
        }
        tracing::debug!(%faction, turn = self.turn, "faction turn started");
    }

    /// Explicitly passes every budget the faction has left, returning how many
    /// units passed.
    pub fn pass_remaining(&mut self, faction: FactionId, sink: &mut dyn PresentationSink) -> usize {
        let Some(roster) = self.rosters.get_mut(&faction) else {
            return 0;
        };
        let mut passed = 0;
        for unit in roster.units_mut().filter(|unit| unit.has_budget()) {
            unit.consume(unit.budget);
            sink.notify(&TacticalEvent::Passed { unit: unit.id });
            passed += 1;
        }
        passed
    }

    /// Drops dead units from every roster, returning their ids.
    pub fn prune_dead(&mut self) -> Vec<UnitId> {
        self.rosters
            .values_mut()
            .flat_map(|roster| roster.prune())
            .collect()
    }

    pub(crate) fn kill(&mut self, id: UnitId) {
        let Some(unit) = self.unit_mut(id) else {
            return;
        };
        let position = unit.position;
        let faction = unit.faction;
        unit.kill();
        if self.occupancy.get(&position) == Some(&id) {
            self.occupancy.remove(&position);
        }
        if let Some(roster) = self.rosters.get_mut(&faction) {
            roster.mark_changed();
        }
        // The freed tile no longer blocks anyone hostile to the dead unit.
        for roster in self.rosters.values_mut() {
            if roster.faction() == faction {
                continue;
            }
            for other in roster.units_mut() {
                other.forget_field();
            }
        }
        tracing::debug!(unit = %id, %position, "unit killed");
    }
}
