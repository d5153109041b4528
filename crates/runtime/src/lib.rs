//! Turn-advance orchestration for tactical skirmishes.
//!
//! The runtime owns the battlefield and one [`OrderScheduler`] per faction,
//! alternates faction turns, prunes the dead, and stops once a single faction
//! is left standing. It also provides the process-level ambient pieces:
//! env-driven configuration, logging bootstrap and a tracing-backed
//! presentation sink.
//!
//! [`OrderScheduler`]: tactics_core::OrderScheduler
pub mod config;
pub mod error;
pub mod logging;
pub mod sink;
pub mod skirmish;

pub use config::SkirmishConfig;
pub use error::{Result, RuntimeError};
pub use sink::TracingSink;
pub use skirmish::{Skirmish, SkirmishBuilder, SkirmishOutcome};
