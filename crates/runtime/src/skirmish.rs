//! The turn-advance loop.
//!
//! A round gives every scheduled faction one turn in scheduler order. Factions
//! without living units are skipped; the skirmish is decided once at most one
//! faction is left standing.
use std::collections::BTreeSet;

use tactics_content::{ContentFactory, PreparedBattle};
use tactics_core::{
    Battlefield, CombatResolver, FactionId, OrderScheduler, PresentationSink, StrengthCombat,
    TacticsConfig, TurnEnv, TurnSummary,
};

use crate::error::{Result, RuntimeError};
use crate::sink::TracingSink;

/// How a skirmish ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkirmishOutcome {
    /// Last faction standing, or `None` on a stalemate or mutual wipe-out.
    pub winner: Option<FactionId>,
    /// Completed rounds.
    pub rounds: u32,
    /// Faction turns actually played.
    pub turns: u32,
}

pub struct Skirmish {
    battlefield: Battlefield,
    schedulers: Vec<OrderScheduler>,
    config: TacticsConfig,
    combat: Box<dyn CombatResolver>,
    sink: Box<dyn PresentationSink>,
    cursor: usize,
    rounds: u32,
    turns: u32,
}

impl Skirmish {
    /// Create a new skirmish builder
    pub fn builder() -> SkirmishBuilder {
        SkirmishBuilder::new()
    }

    /// Assembles a skirmish from a scenario in the content directory, using
    /// the default combat resolver and sink.
    pub fn load(factory: &ContentFactory, scenario: &str) -> Result<Self> {
        let battle = factory
            .build_scenario(scenario)
            .map_err(|reason| RuntimeError::Content {
                scenario: scenario.to_string(),
                reason,
            })?;
        Self::builder().prepared(battle).build()
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn config(&self) -> &TacticsConfig {
        &self.config
    }

    pub fn schedulers(&self) -> &[OrderScheduler] {
        &self.schedulers
    }

    /// Mutable access for an outer strategy layer that changes orders between turns.
    pub fn scheduler_mut(&mut self, faction: FactionId) -> Option<&mut OrderScheduler> {
        self.schedulers
            .iter_mut()
            .find(|scheduler| scheduler.faction() == faction)
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn is_decided(&self) -> bool {
        self.battlefield.standing_factions().len() <= 1
    }

    /// The only faction with living units, if exactly one remains.
    pub fn winner(&self) -> Option<FactionId> {
        match self.battlefield.standing_factions().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Plays the next faction turn.
    ///
    /// Returns `None` once the skirmish is decided. Turns cannot fail: every
    /// refusal inside the tactical core degrades to "no action".
    pub fn step(&mut self) -> Option<TurnSummary> {
        if self.is_decided() {
            return None;
        }

        for _ in 0..self.schedulers.len() {
            let index = self.cursor;
            self.advance_cursor();

            let faction = self.schedulers[index].faction();
            if self.battlefield.living_units(faction).is_empty() {
                tracing::debug!(%faction, "faction has no living units, skipping turn");
                continue;
            }

            self.battlefield.begin_faction_turn(faction);
            let summary = {
                let mut env = TurnEnv::new(self.combat.as_mut(), self.sink.as_mut());
                self.schedulers[index].execute(&mut self.battlefield, &self.config, &mut env)
            };
            let pruned = self.battlefield.prune_dead();
            self.turns += 1;

            tracing::info!(
                %faction,
                round = self.rounds,
                order = self.schedulers[index].order().as_ref(),
                engagements = summary.engagements.len(),
                strikes = summary.strikes(),
                casualties = pruned.len(),
                "turn completed"
            );
            return Some(summary);
        }

        None
    }

    /// Runs turns until one faction remains or `max_rounds` rounds have been
    /// completed.
    pub fn run(&mut self, max_rounds: u32) -> SkirmishOutcome {
        while self.rounds < max_rounds {
            if self.step().is_none() {
                break;
            }
        }

        let outcome = SkirmishOutcome {
            winner: self.winner(),
            rounds: self.rounds,
            turns: self.turns,
        };
        match outcome.winner {
            Some(faction) => tracing::info!(%faction, rounds = outcome.rounds, "skirmish won"),
            None => tracing::info!(rounds = outcome.rounds, "skirmish ended without a winner"),
        }
        outcome
    }

    fn advance_cursor(&mut self) {
        self.cursor += 1;
        if self.cursor == self.schedulers.len() {
            self.cursor = 0;
            self.rounds += 1;
        }
    }
}

/// Builder for [`Skirmish`].
pub struct SkirmishBuilder {
    battlefield: Option<Battlefield>,
    schedulers: Vec<OrderScheduler>,
    config: TacticsConfig,
    combat: Option<Box<dyn CombatResolver>>,
    sink: Option<Box<dyn PresentationSink>>,
}

impl SkirmishBuilder {
    fn new() -> Self {
        Self {
            battlefield: None,
            schedulers: Vec::new(),
            config: TacticsConfig::default(),
            combat: None,
            sink: None,
        }
    }

    /// Provide the battlefield (required)
    pub fn battlefield(mut self, battlefield: Battlefield) -> Self {
        self.battlefield = Some(battlefield);
        self
    }

    /// Append a faction scheduler; turn order follows insertion order
    pub fn scheduler(mut self, scheduler: OrderScheduler) -> Self {
        self.schedulers.push(scheduler);
        self
    }

    /// Override tactics configuration
    pub fn config(mut self, config: TacticsConfig) -> Self {
        self.config = config;
        self
    }

    /// Take battlefield, schedulers and configuration from loaded content
    pub fn prepared(mut self, battle: PreparedBattle) -> Self {
        self.battlefield = Some(battle.battlefield);
        self.schedulers = battle.schedulers;
        self.config = battle.config;
        self
    }

    /// Set combat resolver (default: [`StrengthCombat`])
    pub fn combat(mut self, combat: impl CombatResolver + 'static) -> Self {
        self.combat = Some(Box::new(combat));
        self
    }

    /// Set presentation sink (default: [`TracingSink`])
    pub fn sink(mut self, sink: impl PresentationSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Validates that every faction on the battlefield with living units has
    /// exactly one scheduler and that no scheduler names an absent faction.
    pub fn build(self) -> Result<Skirmish> {
        let battlefield = self.battlefield.ok_or(RuntimeError::MissingBattlefield)?;
        if self.schedulers.is_empty() {
            return Err(RuntimeError::NoFactions);
        }

        let mut scheduled = BTreeSet::new();
        for scheduler in &self.schedulers {
            let faction = scheduler.faction();
            if !scheduled.insert(faction) {
                return Err(RuntimeError::DuplicateScheduler(faction));
            }
            if battlefield.roster(faction).is_none() {
                return Err(RuntimeError::UnknownFaction(faction));
            }
        }
        if let Some(orphan) = battlefield
            .standing_factions()
            .into_iter()
            .find(|faction| !scheduled.contains(faction))
        {
            return Err(RuntimeError::MissingScheduler(orphan));
        }

        Ok(Skirmish {
            battlefield,
            schedulers: self.schedulers,
            config: self.config,
            combat: self.combat.unwrap_or_else(|| Box::new(StrengthCombat)),
            sink: self.sink.unwrap_or_else(|| Box::new(TracingSink)),
            cursor: 0,
            rounds: 0,
            turns: 0,
        })
    }
}
