use crate::error::{ErrorSeverity, TacticsError};
use crate::search::attack_disk;
use crate::state::{ActionBudget, Position, Unit, UnitId};

use super::{Battlefield, TacticalEvent, TurnEnv};

/// Result of a single strike as decided by the combat resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub damage: u32,
    pub defender_killed: bool,
}

/// Damage rules live outside the tactical core.
///
/// The resolver only decides how much damage a strike deals; the battlefield
/// applies it and declares the defender dead when its health reaches zero.
pub trait CombatResolver {
    fn resolve_attack(&mut self, attacker: &Unit, defender: &Unit) -> u32;
}

/// Deterministic resolver: a strike deals the attacker's strength.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrengthCombat;

impl CombatResolver for StrengthCombat {
    fn resolve_attack(&mut self, attacker: &Unit, _defender: &Unit) -> u32 {
        attacker.strength
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} has no action left this turn")]
    NoActionBudget(UnitId),

    #[error("{target} is outside the attack range of unit {attacker}")]
    OutOfRange { attacker: UnitId, target: Position },

    #[error("no enemy stands at {target}")]
    NoEnemy { target: Position },
}

impl TacticsError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            AttackError::UnitNotFound(_) => ErrorSeverity::Validation,
            AttackError::NoActionBudget(_)
            | AttackError::OutOfRange { .. }
            | AttackError::NoEnemy { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AttackError::UnitNotFound(_) => "ATTACK_UNIT_NOT_FOUND",
            AttackError::NoActionBudget(_) => "ATTACK_NO_BUDGET",
            AttackError::OutOfRange { .. } => "ATTACK_OUT_OF_RANGE",
            AttackError::NoEnemy { .. } => "ATTACK_NO_ENEMY",
        }
    }
}

/// Attack geometry and strike commits.
impl Battlefield {
    /// Every on-grid tile within the unit's Manhattan attack radius.
    pub fn attackable_tiles(&self, id: UnitId) -> Vec<Position> {
        self.unit(id)
            .map(|unit| attack_disk(&self.grid, unit.position, unit.attack_range))
            .unwrap_or_default()
    }

    /// A strike is legal when the target tile is in the attack disk, a living
    /// enemy stands on it, and the attacker still has its action.
    pub fn can_attack(&self, id: UnitId, target: Position) -> bool {
        self.check_attack(id, target).is_ok()
    }

    fn check_attack(&self, id: UnitId, target: Position) -> Result<UnitId, AttackError> {
        let attacker = self.unit(id).ok_or(AttackError::UnitNotFound(id))?;
        if !attacker.can_act() {
            return Err(AttackError::NoActionBudget(id));
        }
        if attacker.position.manhattan(target) > attacker.attack_range
            || attacker.position == target
            || !self.grid.contains(target)
        {
            return Err(AttackError::OutOfRange {
                attacker: id,
                target,
            });
        }
        self.occupant(target)
            .filter(|defender| defender.is_hostile_to(attacker))
            .map(|defender| defender.id)
            .ok_or(AttackError::NoEnemy { target })
    }

    /// Strikes the enemy on `target`, spending the attacker's action.
    pub fn attack(
        &mut self,
        id: UnitId,
        target: Position,
        env: &mut TurnEnv<'_>,
    ) -> Result<AttackOutcome, AttackError> {
        let defender_id = self.check_attack(id, target)?;

        let damage = {
            let attacker = self.unit(id).ok_or(AttackError::UnitNotFound(id))?;
            let defender = self
                .unit(defender_id)
                .ok_or(AttackError::UnitNotFound(defender_id))?;
            env.combat.resolve_attack(attacker, defender)
        };

        if let Some(attacker) = self.unit_mut(id) {
            attacker.consume(ActionBudget::ACT);
        }

        let defender = self
            .unit_mut(defender_id)
            .ok_or(AttackError::UnitNotFound(defender_id))?;
        defender.health.drain(damage);
        let defender_killed = defender.health.is_depleted();

        tracing::trace!(
            attacker = %id,
            defender = %defender_id,
            damage,
            defender_killed,
            "attack committed"
        );
        env.sink.notify(&TacticalEvent::Attacked {
            attacker: id,
            defender: defender_id,
            target,
            damage,
        });

        if defender_killed {
            self.kill(defender_id);
            env.sink.notify(&TacticalEvent::Died {
                unit: defender_id,
                position: target,
            });
        }

        Ok(AttackOutcome {
            damage,
            defender_killed,
        })
    }
}
