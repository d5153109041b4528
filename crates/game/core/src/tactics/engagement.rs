//! Coordinated attack resolution.
//!
//! # Steps
//!
//! 1. **Reach matrix**: every own unit that still has its action contributes
//!    its reachable tiles, giving a tile → units mapping.
//! 2. **Candidates**: each living enemy in scope intersects its adjacent tiles
//!    (scan order) with the reach matrix.
//! 3. **Enumeration**: the Cartesian product of slot choices per enemy, see
//!    [`Arrangements`](super::Arrangements).
//! 4. **Selection**: highest distinct-unit score, first found wins ties.
//! 5. **Commit**: each distinct unit moves to its slot once and strikes the
//!    enemy while it is still standing.
//!
//! Units left over are handled by [`reposition`](super::reposition).
use std::collections::BTreeMap;

use crate::battle::{AttackOutcome, Battlefield, TurnEnv};
use crate::state::{Position, UnitId};

use super::arrangement::{Arrangement, EngagementCandidate, Slot, select_best};

/// Inclusive rectangle of tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub min: Position,
    pub max: Position,
}

impl Zone {
    /// Builds a zone from any two opposite corners.
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            min: Position::new(a.x.min(b.x), a.y.min(b.y)),
            max: Position::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.min.x..=self.max.x).contains(&position.x)
            && (self.min.y..=self.max.y).contains(&position.y)
    }
}

/// Which enemies an engagement may target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngagementScope {
    #[default]
    All,
    Target(UnitId),
    Zone(Zone),
}

impl EngagementScope {
    pub fn admits(&self, enemy: UnitId, position: Position) -> bool {
        match self {
            EngagementScope::All => true,
            EngagementScope::Target(target) => *target == enemy,
            EngagementScope::Zone(zone) => zone.contains(position),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub attacker: UnitId,
    pub outcome: AttackOutcome,
}

/// What a committed engagement did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngagementReport {
    pub enemy: UnitId,
    pub arrangement: Arrangement,
    /// Units that actually changed tiles, in commit order.
    pub moved: Vec<UnitId>,
    pub strikes: Vec<Strike>,
}

impl EngagementReport {
    pub fn score(&self) -> usize {
        self.arrangement.score()
    }

    pub fn made_progress(&self) -> bool {
        !self.moved.is_empty() || !self.strikes.is_empty()
    }

    pub fn enemy_killed(&self) -> bool {
        self.strikes
            .iter()
            .any(|strike| strike.outcome.defender_killed)
    }
}

/// Tile → units that can stand on it this turn.
pub type ReachMatrix = BTreeMap<Position, Vec<UnitId>>;

/// Step 1. Only living units with their action left take part, and a tile held
/// by a living unit is only ever a slot for that unit.
pub fn reach_matrix(battlefield: &mut Battlefield, own: &[UnitId]) -> ReachMatrix {
    let mut matrix = ReachMatrix::new();
    for &id in own {
        if !battlefield.unit(id).is_some_and(|unit| unit.can_act()) {
            continue;
        }
        for tile in battlefield.reachable_tiles(id) {
            if battlefield
                .occupant(tile)
                .is_some_and(|occupant| occupant.id != id)
            {
                continue;
            }
            let units = matrix.entry(tile).or_default();
            if !units.contains(&id) {
                units.push(id);
            }
        }
    }
    matrix
}

/// Step 2. Enemies without a single reachable adjacent tile are skipped.
pub fn engagement_candidates(
    battlefield: &Battlefield,
    matrix: &ReachMatrix,
    enemies: &[UnitId],
    scope: &EngagementScope,
) -> Vec<EngagementCandidate> {
    let mut candidates = Vec::new();
    for &enemy in enemies {
        let Some(unit) = battlefield.unit(enemy).filter(|unit| unit.is_alive()) else {
            continue;
        };
        if !scope.admits(enemy, unit.position) {
            continue;
        }

        let mut candidate = EngagementCandidate::new(enemy, unit.position);
        for tile in battlefield.grid().neighbors(unit.position) {
            let Some(units) = matrix.get(&tile).filter(|units| !units.is_empty()) else {
                continue;
            };
            candidate.slots.push(Slot {
                tile,
                units: units.clone(),
            });
        }
        if !candidate.is_empty() {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Runs Steps 1–5 and commits the winning arrangement.
///
/// Returns `None` without touching the battlefield when there is no viable
/// arrangement, including when either side is empty.
pub fn resolve_engagement(
    battlefield: &mut Battlefield,
    own: &[UnitId],
    enemies: &[UnitId],
    scope: &EngagementScope,
    env: &mut TurnEnv<'_>,
) -> Option<EngagementReport> {
    if own.is_empty() || enemies.is_empty() {
        return None;
    }

    let matrix = reach_matrix(battlefield, own);
    if matrix.is_empty() {
        return None;
    }
    let candidates = engagement_candidates(battlefield, &matrix, enemies, scope);
    let arrangement = select_best(&candidates)?;

    tracing::debug!(
        enemy = %arrangement.enemy,
        target = %arrangement.target,
        score = arrangement.score(),
        candidates = candidates.len(),
        "engagement selected"
    );
    Some(commit(battlefield, arrangement, env))
}

fn commit(
    battlefield: &mut Battlefield,
    arrangement: Arrangement,
    env: &mut TurnEnv<'_>,
) -> EngagementReport {
    let mut report = EngagementReport {
        enemy: arrangement.enemy,
        arrangement: arrangement.clone(),
        moved: Vec::new(),
        strikes: Vec::new(),
    };
    let mut committed: Vec<UnitId> = Vec::new();

    for &(tile, unit) in &arrangement.assignments {
        if committed.contains(&unit) {
            continue;
        }
        committed.push(unit);

        let in_place = battlefield
            .unit(unit)
            .is_some_and(|state| state.position == tile);
        if !in_place {
            match battlefield.move_unit(unit, tile, env) {
                Ok(_) => report.moved.push(unit),
                Err(error) => {
                    tracing::debug!(%unit, %tile, %error, "engagement move skipped");
                    continue;
                }
            }
        }

        if !battlefield.is_alive(arrangement.enemy)
            || !battlefield.can_attack(unit, arrangement.target)
        {
            continue;
        }
        match battlefield.attack(unit, arrangement.target, env) {
            Ok(outcome) => report.strikes.push(Strike {
                attacker: unit,
                outcome,
            }),
            Err(error) => tracing::debug!(%unit, %error, "engagement strike skipped"),
        }
    }

    report
}

/// Engagement entry points.
impl Battlefield {
    /// See [`resolve_engagement`].
    pub fn resolve_engagement(
        &mut self,
        own: &[UnitId],
        enemies: &[UnitId],
        scope: &EngagementScope,
        env: &mut TurnEnv<'_>,
    ) -> Option<EngagementReport> {
        resolve_engagement(self, own, enemies, scope, env)
    }
}
