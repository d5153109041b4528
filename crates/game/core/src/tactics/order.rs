//! Per-faction orders and the scheduler that carries them out.
use crate::battle::{Battlefield, TurnEnv};
use crate::config::TacticsConfig;
use crate::state::{FactionId, Position, UnitId};

use super::engagement::{EngagementReport, EngagementScope, Zone, resolve_engagement};
use super::reposition::{move_toward, reposition, retreat};

/// Standing order for a whole faction, chosen by an outer strategy layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Order {
    /// Gather around `point`.
    Cluster { point: Position },
    /// Engage anything, optionally only inside `zone`.
    Attack { zone: Option<Zone> },
    /// Engage the enemy nearest `anchor` within `radius`, then fall back on it.
    HoldAndDefend {
        anchor: Position,
        radius: Option<u32>,
    },
    /// Pull away from the nearest enemy.
    Retreat,
    /// Concentrate every available attacker on one enemy.
    Surround { target: UnitId },
}

impl Default for Order {
    fn default() -> Self {
        Order::Attack { zone: None }
    }
}

/// What one faction turn did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSummary {
    pub faction: FactionId,
    pub engagements: Vec<EngagementReport>,
    /// Units that changed tiles outside an engagement.
    pub repositioned: usize,
    /// Units that still had budget at the end and passed it.
    pub passed: usize,
}

impl TurnSummary {
    fn new(faction: FactionId) -> Self {
        Self {
            faction,
            engagements: Vec::new(),
            repositioned: 0,
            passed: 0,
        }
    }

    pub fn strikes(&self) -> usize {
        self.engagements
            .iter()
            .map(|report| report.strikes.len())
            .sum()
    }

    pub fn kills(&self) -> usize {
        self.engagements
            .iter()
            .flat_map(|report| report.strikes.iter())
            .filter(|strike| strike.outcome.defender_killed)
            .count()
    }
}

/// Drives one faction's units according to its active [`Order`].
///
/// Keeps its own copy of the faction's living unit ids and refreshes it only
/// when the roster reports a change.
#[derive(Clone, Debug)]
pub struct OrderScheduler {
    faction: FactionId,
    order: Order,
    units: Vec<UnitId>,
}

impl OrderScheduler {
    pub fn new(faction: FactionId, order: Order) -> Self {
        Self {
            faction,
            order,
            units: Vec::new(),
        }
    }

    pub fn faction(&self) -> FactionId {
        self.faction
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn set_order(&mut self, order: Order) {
        self.order = order;
    }

    /// Cached unit ids as of the last refresh.
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    /// Plays the faction's turn. Every unit's budget is spent or passed by the
    /// time this returns.
    pub fn execute(
        &mut self,
        battlefield: &mut Battlefield,
        config: &TacticsConfig,
        env: &mut TurnEnv<'_>,
    ) -> TurnSummary {
        self.refresh(battlefield);
        let mut summary = TurnSummary::new(self.faction);

        match self.order {
            Order::Attack { zone } => {
                let scope = zone.map_or(EngagementScope::All, EngagementScope::Zone);
                self.engage(battlefield, scope, config.engagement_rounds, env, &mut summary);
                summary.repositioned = reposition(battlefield, &self.movers(battlefield), env);
            }
            Order::Surround { target } => {
                self.engage(battlefield, EngagementScope::Target(target), 1, env, &mut summary);
                summary.repositioned = reposition(battlefield, &self.movers(battlefield), env);
            }
            Order::HoldAndDefend { anchor, radius } => {
                let radius = radius.unwrap_or(config.hold_radius);
                if let Some(enemy) = nearest_enemy_within(battlefield, self.faction, anchor, radius) {
                    self.engage(battlefield, EngagementScope::Target(enemy), 1, env, &mut summary);
                }
                summary.repositioned = self.cluster(battlefield, anchor, env);
            }
            Order::Cluster { point } => {
                summary.repositioned = self.cluster(battlefield, point, env);
            }
            Order::Retreat => {
                summary.repositioned = self
                    .movers(battlefield)
                    .into_iter()
                    .filter(|&id| retreat(battlefield, id, env))
                    .count();
            }
        }

        summary.passed = battlefield.pass_remaining(self.faction, &mut *env.sink);
        tracing::debug!(
            faction = %self.faction,
            order = self.order.as_ref(),
            engagements = summary.engagements.len(),
            strikes = summary.strikes(),
            repositioned = summary.repositioned,
            passed = summary.passed,
            "order executed"
        );
        summary
    }

    fn refresh(&mut self, battlefield: &mut Battlefield) {
        let Some(roster) = battlefield.roster_mut(self.faction) else {
            self.units.clear();
            return;
        };
        if roster.take_changed() || self.units.is_empty() {
            self.units = roster.living_ids();
        }
    }

    fn living(&self, battlefield: &Battlefield) -> Vec<UnitId> {
        self.units
            .iter()
            .copied()
            .filter(|&id| battlefield.is_alive(id))
            .collect()
    }

    fn movers(&self, battlefield: &Battlefield) -> Vec<UnitId> {
        self.units
            .iter()
            .copied()
            .filter(|&id| battlefield.unit(id).is_some_and(|unit| unit.can_move()))
            .collect()
    }

    /// Resolves engagements until one makes no progress or `rounds` is used up.
    fn engage(
        &self,
        battlefield: &mut Battlefield,
        scope: EngagementScope,
        rounds: u32,
        env: &mut TurnEnv<'_>,
        summary: &mut TurnSummary,
    ) {
        for _ in 0..rounds.max(1) {
            let own = self.living(battlefield);
            let enemies = battlefield.enemies_of(self.faction);
            let Some(report) = resolve_engagement(battlefield, &own, &enemies, &scope, env) else {
                break;
            };
            let progressed = report.made_progress();
            summary.engagements.push(report);
            if !progressed {
                break;
            }
        }
    }

    fn cluster(&self, battlefield: &mut Battlefield, point: Position, env: &mut TurnEnv<'_>) -> usize {
        self.movers(battlefield)
            .into_iter()
            .filter(|&id| move_toward(battlefield, id, point, env))
            .count()
    }
}

/// Living enemy nearest `anchor` by Manhattan distance, if any is within
/// `radius`. Earlier enemies win ties.
pub fn nearest_enemy_within(
    battlefield: &Battlefield,
    faction: FactionId,
    anchor: Position,
    radius: u32,
) -> Option<UnitId> {
    battlefield
        .enemies_of(faction)
        .into_iter()
        .filter_map(|id| battlefield.unit(id))
        .map(|unit| (anchor.manhattan(unit.position), unit.id))
        .filter(|&(distance, _)| distance <= radius)
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{RecordingSink, StrengthCombat, TacticalEvent};
    use crate::env::{Grid, GridDimensions, MovementProfile, TerrainKind};
    use crate::state::UnitTemplate;

    const BLUE: FactionId = FactionId(0);
    const RED: FactionId = FactionId(1);

    fn trooper() -> UnitTemplate {
        UnitTemplate::new(MovementProfile::ground(), 3, 1)
            .with_strength(2)
            .with_max_health(4)
    }

    fn open(width: u32, height: u32) -> Battlefield {
        Battlefield::new(Grid::new(
            GridDimensions::new(width, height),
            TerrainKind::Open,
        ))
    }

    fn all_spent(field: &Battlefield, faction: FactionId) -> bool {
        field
            .roster(faction)
            .is_some_and(|roster| roster.living().all(|unit| !unit.has_budget()))
    }

    #[test]
    fn attack_engages_then_passes_everything() {
        let mut field = open(8, 8);
        field.spawn(BLUE, &trooper(), Position::new(1, 3)).expect("open");
        field.spawn(BLUE, &trooper(), Position::new(3, 1)).expect("open");
        let enemy = field.spawn(RED, &trooper(), Position::new(3, 3)).expect("open");
        let mut scheduler = OrderScheduler::new(BLUE, Order::default());
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        let summary = scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);

        assert_eq!(summary.faction, BLUE);
        assert_eq!(summary.engagements[0].score(), 2);
        assert_eq!(summary.strikes(), 2);
        assert_eq!(summary.kills(), 1);
        assert!(!field.is_alive(enemy));
        assert!(all_spent(&field, BLUE));
        assert_eq!(scheduler.units().len(), 2);
    }

    #[test]
    fn surround_ignores_other_enemies() {
        let mut field = open(9, 3);
        let blue = field.spawn(BLUE, &trooper(), Position::new(4, 1)).expect("open");
        let decoy = field.spawn(RED, &trooper(), Position::new(2, 1)).expect("open");
        let target = field.spawn(RED, &trooper(), Position::new(7, 1)).expect("open");
        let mut scheduler = OrderScheduler::new(BLUE, Order::Surround { target });
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        let summary = scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);

        assert_eq!(summary.engagements.len(), 1);
        assert_eq!(summary.engagements[0].enemy, target);
        assert_eq!(field.unit(target).map(|unit| unit.health.current), Some(2));
        assert_eq!(field.unit(decoy).map(|unit| unit.health.current), Some(4));
        assert!(sink.events().iter().any(|event| matches!(
            event,
            TacticalEvent::Attacked { attacker, .. } if *attacker == blue
        )));
    }

    #[test]
    fn hold_and_defend_ignores_distant_enemies() {
        let mut field = open(12, 1);
        let guard = field.spawn(BLUE, &trooper(), Position::new(3, 0)).expect("open");
        field.spawn(RED, &trooper(), Position::new(11, 0)).expect("open");
        let order = Order::HoldAndDefend {
            anchor: Position::new(0, 0),
            radius: None,
        };
        let mut scheduler = OrderScheduler::new(BLUE, order);
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        let summary = scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);

        assert!(summary.engagements.is_empty());
        assert_eq!(summary.repositioned, 1);
        assert_eq!(field.unit(guard).map(|unit| unit.position), Some(Position::new(0, 0)));
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn hold_and_defend_strikes_intruders_within_radius() {
        let mut field = open(12, 1);
        field.spawn(BLUE, &trooper(), Position::new(2, 0)).expect("open");
        let intruder = field.spawn(RED, &trooper(), Position::new(4, 0)).expect("open");
        field.spawn(RED, &trooper(), Position::new(10, 0)).expect("open");
        let order = Order::HoldAndDefend {
            anchor: Position::new(1, 0),
            radius: Some(3),
        };
        let mut scheduler = OrderScheduler::new(BLUE, order);
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        let summary = scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);

        assert_eq!(summary.engagements.len(), 1);
        assert_eq!(summary.engagements[0].enemy, intruder);
        assert_eq!(summary.repositioned, 0);
    }

    #[test]
    fn retreat_and_cluster_move_every_unit() {
        let mut field = open(10, 1);
        let runner = field.spawn(BLUE, &trooper(), Position::new(5, 0)).expect("open");
        field.spawn(RED, &trooper(), Position::new(8, 0)).expect("open");
        let mut scheduler = OrderScheduler::new(BLUE, Order::Retreat);
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        let summary = scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);
        assert_eq!(summary.repositioned, 1);
        assert_eq!(field.unit(runner).map(|unit| unit.position), Some(Position::new(2, 0)));

        field.begin_faction_turn(BLUE);
        scheduler.set_order(Order::Cluster {
            point: Position::new(4, 0),
        });
        let summary = scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);
        assert_eq!(summary.repositioned, 1);
        assert_eq!(field.unit(runner).map(|unit| unit.position), Some(Position::new(4, 0)));
        assert!(all_spent(&field, BLUE));
    }

    #[test]
    fn later_rounds_walk_through_tiles_freed_by_a_kill() {
        let mut field = open(6, 1);
        let line = |health| {
            UnitTemplate::new(MovementProfile::ground(), 4, 1).with_max_health(health)
        };
        let rear = field.spawn(BLUE, &line(4), Position::new(0, 0)).expect("open");
        field.spawn(BLUE, &line(4), Position::new(1, 0)).expect("open");
        let screen = field.spawn(RED, &line(2), Position::new(2, 0)).expect("open");
        field.spawn(BLUE, &line(4), Position::new(3, 0)).expect("open");
        let anchor = field.spawn(RED, &line(10), Position::new(5, 0)).expect("open");
        let mut scheduler = OrderScheduler::new(BLUE, Order::default());
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        let summary = scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);

        assert_eq!(summary.engagements.len(), 2);
        assert_eq!(summary.engagements[0].enemy, screen);
        assert!(summary.engagements[0].enemy_killed());
        assert_eq!(summary.engagements[1].enemy, anchor);
        assert_eq!(field.unit(rear).map(|unit| unit.position), Some(Position::new(4, 0)));
        assert_eq!(field.unit(anchor).map(|unit| unit.health.current), Some(9));
    }

    #[test]
    fn roster_cache_follows_changes() {
        let mut field = open(6, 1);
        let first = field.spawn(BLUE, &trooper(), Position::new(0, 0)).expect("open");
        let mut scheduler = OrderScheduler::new(BLUE, Order::Retreat);
        let mut combat = StrengthCombat;
        let mut sink = RecordingSink::new();
        let mut env = TurnEnv::new(&mut combat, &mut sink);

        scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);
        assert_eq!(scheduler.units(), &[first]);

        let second = field.spawn(BLUE, &trooper(), Position::new(5, 0)).expect("open");
        field.begin_faction_turn(BLUE);
        scheduler.execute(&mut field, &TacticsConfig::default(), &mut env);
        assert_eq!(scheduler.units(), &[first, second]);
    }

    #[test]
    fn order_names_are_snake_case() {
        assert_eq!(Order::Retreat.as_ref(), "retreat");
        assert_eq!(
            Order::HoldAndDefend {
                anchor: Position::ORIGIN,
                radius: None
            }
            .as_ref(),
            "hold_and_defend"
        );
    }
}
