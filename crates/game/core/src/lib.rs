//! Deterministic tactical rules for turn-based grid combat.
//!
//! `tactics-core` owns the grid, the units and their per-turn budgets, and the
//! searches that decide where units can go and whom they can hit. Everything
//! is synchronous and single-threaded: all mutation flows through
//! [`Battlefield`] on the thread running the current faction turn, and the only
//! outside effects go through the [`CombatResolver`] and [`PresentationSink`]
//! collaborators bundled in a [`TurnEnv`].
pub mod battle;
pub mod config;
pub mod env;
pub mod error;
pub mod search;
pub mod state;
pub mod tactics;

pub use battle::{
    AttackError, AttackOutcome, Battlefield, CombatResolver, MoveError, NullSink,
    PresentationSink, RecordingSink, SpawnError, StrengthCombat, TacticalEvent, TurnEnv,
};
pub use config::TacticsConfig;
pub use env::{Grid, GridDimensions, GridError, MovementKind, MovementProfile, TerrainKind, Tile};
pub use error::{ErrorSeverity, TacticsError};
pub use search::{CostField, attack_disk, descend};
pub use state::{
    ActionBudget, Direction, FactionId, Position, ResourceMeter, Roster, Unit, UnitId,
    UnitTemplate,
};
pub use tactics::{
    Arrangement, EngagementCandidate, EngagementReport, EngagementScope, Order, OrderScheduler,
    Slot, Strike, TurnSummary, Zone, reposition, resolve_engagement,
};
