//! Unified error types surfaced by the runtime.
//!
//! Wraps content failures and scheduling misconfiguration so the binary can
//! bubble them up with consistent context.
use thiserror::Error;

use tactics_core::FactionId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("skirmish requires a battlefield before building")]
    MissingBattlefield,

    #[error("skirmish has no factions to schedule")]
    NoFactions,

    #[error("{0} has living units but no order scheduler")]
    MissingScheduler(FactionId),

    #[error("{0} is scheduled more than once")]
    DuplicateScheduler(FactionId),

    #[error("{0} is scheduled but not present on the battlefield")]
    UnknownFaction(FactionId),

    #[error("failed to load scenario '{scenario}': {reason:#}")]
    Content {
        scenario: String,
        reason: anyhow::Error,
    },
}
