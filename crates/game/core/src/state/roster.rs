use super::{FactionId, Unit, UnitId};

/// Ordered collection of one faction's units.
///
/// Mutations (spawns, deaths, pruning) raise a `changed` flag that order
/// evaluation consumes once through [`Roster::take_changed`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    faction: FactionId,
    units: Vec<Unit>,
    changed: bool,
}

impl Roster {
    pub fn new(faction: FactionId) -> Self {
        Self {
            faction,
            units: Vec::new(),
            changed: false,
        }
    }

    pub fn faction(&self) -> FactionId {
        self.faction
    }

    pub(crate) fn add(&mut self, unit: Unit) {
        self.units.push(unit);
        self.changed = true;
    }

    /// Physically drops every dead unit, returning their ids in roster order.
    pub(crate) fn prune(&mut self) -> Vec<UnitId> {
        let removed: Vec<UnitId> = self
            .units
            .iter()
            .filter(|unit| !unit.is_alive())
            .map(|unit| unit.id)
            .collect();
        if !removed.is_empty() {
            self.units.retain(Unit::is_alive);
            self.changed = true;
        }
        removed
    }

    pub(crate) fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Returns whether the roster changed since the last call, clearing the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    /// Every unit still on the roster, dead ones included until pruned.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub(crate) fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    pub fn living(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|unit| unit.is_alive())
    }

    pub fn living_ids(&self) -> Vec<UnitId> {
        self.living().map(|unit| unit.id).collect()
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.get(id).is_some_and(Unit::is_alive)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
