//! Mutable battle state: identifiers, units and per-faction rosters.
mod common;
mod roster;
mod unit;

pub use common::{Direction, FactionId, Position, ResourceMeter, UnitId};
pub use roster::Roster;
pub use unit::{ActionBudget, Unit, UnitTemplate};
