use crate::error::{ErrorSeverity, TacticsError};
use crate::search::{CostField, descend};
use crate::state::{ActionBudget, Position, UnitId};

use super::{Battlefield, TacticalEvent, TurnEnv};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} has no movement left this turn")]
    NoMoveBudget(UnitId),

    #[error("destination {destination} is not reachable this turn")]
    Unreachable { destination: Position },

    #[error("destination {destination} is held by unit {occupant}")]
    Occupied {
        destination: Position,
        occupant: UnitId,
    },
}

impl TacticsError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::UnitNotFound(_) => ErrorSeverity::Validation,
            MoveError::NoMoveBudget(_)
            | MoveError::Unreachable { .. }
            | MoveError::Occupied { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::UnitNotFound(_) => "MOVE_UNIT_NOT_FOUND",
            MoveError::NoMoveBudget(_) => "MOVE_NO_BUDGET",
            MoveError::Unreachable { .. } => "MOVE_UNREACHABLE",
            MoveError::Occupied { .. } => "MOVE_OCCUPIED",
        }
    }
}

/// Reachability, pathing and move commits.
impl Battlefield {
    /// Computes the unit's cost field for the current turn unless a valid one
    /// is already cached. Returns `false` for unknown or dead units.
    fn ensure_field(&mut self, id: UnitId) -> bool {
        let turn = self.turn;
        let field = {
            let Some(unit) = self.unit(id).filter(|unit| unit.is_alive()) else {
                return false;
            };
            if unit.field(turn).is_some() {
                return true;
            }
            CostField::compute(
                &self.grid,
                &unit.profile,
                unit.position,
                unit.movement_range,
                turn,
                |position| self.is_hostile_at(position, unit.faction),
            )
        };
        tracing::trace!(
            unit = %id,
            origin = %field.origin(),
            reachable = field.reachable().len(),
            "cost field computed"
        );
        if let Some(unit) = self.unit_mut(id) {
            unit.store_field(field);
        }
        true
    }

    /// Tiles the unit can reach this turn, in discovery order with its own
    /// tile first. A unit without movement budget reaches only its own tile;
    /// unknown or dead units reach nothing.
    pub fn reachable_tiles(&mut self, id: UnitId) -> Vec<Position> {
        let Some(unit) = self.unit(id).filter(|unit| unit.is_alive()) else {
            return Vec::new();
        };
        if !unit.can_move() {
            return vec![unit.position];
        }
        if !self.ensure_field(id) {
            return Vec::new();
        }
        let turn = self.turn;
        self.unit(id)
            .and_then(|unit| unit.field(turn))
            .map(CostField::reachable)
            .unwrap_or_default()
    }

    /// Recorded cumulative cost from the unit to `position` this turn.
    pub fn cost_to(&mut self, id: UnitId, position: Position) -> Option<u32> {
        if !self.ensure_field(id) {
            return None;
        }
        let turn = self.turn;
        self.unit(id)?.field(turn)?.cost(position)
    }

    /// Ordered route from the unit's tile to `target`, both ends included.
    ///
    /// `None` when the target is out of reach this turn or held by another
    /// living unit; callers treat that as "do not move".
    pub fn path_to(&mut self, id: UnitId, target: Position) -> Option<Vec<Position>> {
        self.plan_move(id, target).ok()
    }

    fn plan_move(&mut self, id: UnitId, target: Position) -> Result<Vec<Position>, MoveError> {
        let unit = self.unit(id).ok_or(MoveError::UnitNotFound(id))?;
        if !unit.is_alive() {
            return Err(MoveError::UnitNotFound(id));
        }
        if let Some(occupant) = self.occupant(target).filter(|occupant| occupant.id != id) {
            return Err(MoveError::Occupied {
                destination: target,
                occupant: occupant.id,
            });
        }
        if unit.position == target {
            return Ok(vec![target]);
        }
        if !unit.can_move() {
            return Err(MoveError::Unreachable {
                destination: target,
            });
        }

        self.ensure_field(id);
        let turn = self.turn;
        self.unit(id)
            .and_then(|unit| unit.field(turn))
            .and_then(|field| descend(field, target))
            .ok_or(MoveError::Unreachable {
                destination: target,
            })
    }

    /// Walks the unit to `target`, spending its movement.
    ///
    /// Moving onto its own tile holds position and still spends the budget.
    /// The unit's cost field is dropped as soon as it relocates.
    pub fn move_unit(
        &mut self,
        id: UnitId,
        target: Position,
        env: &mut TurnEnv<'_>,
    ) -> Result<Vec<Position>, MoveError> {
        if !self.unit(id).is_some_and(|unit| unit.can_move()) {
            return Err(MoveError::NoMoveBudget(id));
        }
        let path = self.plan_move(id, target)?;

        let unit = self.unit_mut(id).ok_or(MoveError::UnitNotFound(id))?;
        let origin = unit.position;
        unit.consume(ActionBudget::MOVE);
        if origin == target {
            return Ok(path);
        }
        unit.relocate(target);

        if self.occupancy.get(&origin) == Some(&id) {
            self.occupancy.remove(&origin);
        }
        self.occupancy.insert(target, id);

        tracing::trace!(unit = %id, from = %origin, to = %target, steps = path.len() - 1, "move committed");
        env.sink.notify(&TacticalEvent::Moved {
            unit: id,
            path: path.clone(),
        });
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{NullSink, RecordingSink, StrengthCombat};
    use crate::env::{Grid, GridDimensions, MovementProfile, TerrainKind};
    use crate::state::{FactionId, UnitTemplate};

    const ALLY: FactionId = FactionId(0);
    const FOE: FactionId = FactionId(1);

    fn template(range: u32) -> UnitTemplate {
        UnitTemplate::new(MovementProfile::ground(), range, 1).with_max_health(3)
    }

    fn open(width: u32, height: u32) -> Battlefield {
        Battlefield::new(Grid::new(
            GridDimensions::new(width, height),
            TerrainKind::Open,
        ))
    }

    #[test]
    fn reachable_set_on_open_ground() {
        let mut field = open(5, 5);
        let id = field
            .spawn(ALLY, &template(2), Position::new(2, 2))
            .expect("open tile");

        let reachable = field.reachable_tiles(id);
        assert_eq!(reachable.len(), 13);
        assert_eq!(reachable[0], Position::new(2, 2));
        for position in reachable {
            assert_eq!(
                field.cost_to(id, position),
                Some(Position::new(2, 2).manhattan(position))
            );
        }
    }

    #[test]
    fn enemies_block_but_allies_do_not() {
        let mut field = open(5, 1);
        let mover = field
            .spawn(ALLY, &template(4), Position::new(0, 0))
            .expect("open tile");
        field
            .spawn(ALLY, &template(1), Position::new(1, 0))
            .expect("open tile");
        let enemy_position = Position::new(3, 0);
        field
            .spawn(FOE, &template(1), enemy_position)
            .expect("open tile");

        let reachable = field.reachable_tiles(mover);
        assert_eq!(
            reachable,
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
        );
        assert!(!reachable.contains(&enemy_position));
        assert!(!reachable.contains(&Position::new(4, 0)));

        // Allies can be walked through but not stood on.
        assert_eq!(field.path_to(mover, Position::new(1, 0)), None);
        assert_eq!(
            field.path_to(mover, Position::new(2, 0)),
            Some(vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0)
            ])
        );
    }

    #[test]
    fn exhausted_unit_reaches_only_itself() {
        let mut field = open(5, 5);
        let id = field
            .spawn(ALLY, &template(3), Position::new(2, 2))
            .expect("open tile");
        let mut combat = StrengthCombat;
        let mut sink = NullSink;
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        field
            .move_unit(id, Position::new(2, 3), &mut env)
            .expect("reachable");
        assert_eq!(field.reachable_tiles(id), vec![Position::new(2, 3)]);
        assert_eq!(
            field.move_unit(id, Position::new(2, 4), &mut env),
            Err(MoveError::NoMoveBudget(id))
        );
    }

    #[test]
    fn moving_invalidates_the_cached_field() {
        let mut field = open(6, 6);
        let id = field
            .spawn(ALLY, &template(2), Position::new(1, 1))
            .expect("open tile");
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();

        assert_eq!(field.cost_to(id, Position::new(3, 1)), Some(2));
        assert!(field.unit(id).is_some_and(|unit| unit.has_cached_field()));

        let mut env = TurnEnv::new(&mut combat, &mut sink);
        let path = field
            .move_unit(id, Position::new(3, 1), &mut env)
            .expect("reachable");
        assert_eq!(path.len(), 3);
        assert!(field.unit(id).is_some_and(|unit| !unit.has_cached_field()));
        assert_eq!(field.occupant(Position::new(3, 1)).map(|unit| unit.id), Some(id));
        assert!(field.occupant(Position::new(1, 1)).is_none());

        // A fresh field is centred on the new tile.
        assert_eq!(field.cost_to(id, Position::new(3, 1)), Some(0));
        assert_eq!(sink.moves(), 1);
    }

    #[test]
    fn new_turn_recomputes_after_the_world_changes() {
        let mut field = open(3, 1);
        let mover = field
            .spawn(ALLY, &template(2), Position::new(0, 0))
            .expect("open tile");
        let blocker = field
            .spawn(FOE, &template(1), Position::new(1, 0))
            .expect("open tile");

        assert_eq!(field.reachable_tiles(mover), vec![Position::new(0, 0)]);

        field.kill(blocker);
        field.begin_faction_turn(ALLY);
        assert_eq!(field.reachable_tiles(mover).len(), 3);
    }

    #[test]
    fn killing_a_blocker_reopens_its_tile_within_the_turn() {
        let mut field = open(3, 1);
        let mover = field
            .spawn(ALLY, &template(2), Position::new(0, 0))
            .expect("open tile");
        let blocker = field
            .spawn(FOE, &template(1), Position::new(1, 0))
            .expect("open tile");

        assert_eq!(field.reachable_tiles(mover), vec![Position::new(0, 0)]);
        assert!(field.unit(mover).is_some_and(|unit| unit.has_cached_field()));

        field.kill(blocker);
        assert!(field.unit(mover).is_some_and(|unit| !unit.has_cached_field()));
        assert_eq!(field.reachable_tiles(mover).len(), 3);
        assert_eq!(field.cost_to(mover, Position::new(2, 0)), Some(2));
    }

    #[test]
    fn unbounded_template_ranges_stay_on_the_grid() {
        let mut field = open(3, 3);
        let id = field
            .spawn(ALLY, &template(u32::MAX), Position::new(1, 1))
            .expect("open tile");

        assert_eq!(field.reachable_tiles(id).len(), 9);
        assert_eq!(
            field.path_to(id, Position::new(2, 2)).map(|path| path.len()),
            Some(3)
        );
    }

    #[test]
    fn holding_position_spends_movement_without_event() {
        let mut field = open(3, 3);
        let id = field
            .spawn(ALLY, &template(1), Position::new(1, 1))
            .expect("open tile");
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        let path = field
            .move_unit(id, Position::new(1, 1), &mut env)
            .expect("own tile");
        assert_eq!(path, vec![Position::new(1, 1)]);
        assert!(field.unit(id).is_some_and(|unit| !unit.can_move()));
        assert_eq!(sink.moves(), 0);
    }
}
