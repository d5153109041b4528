//! Faction-level decision making on top of the battlefield.
//!
//! The canonical shape of a turn is two-phase: try the combinatorial
//! [`resolve_engagement`] first, then greedily [`reposition`] whatever is left.
//! [`OrderScheduler`] composes the two according to the faction's [`Order`].
mod arrangement;
mod engagement;
mod order;
mod reposition;

pub use arrangement::{
    Arrangement, Arrangements, Assignments, EngagementCandidate, Slot, select_best,
};
pub use engagement::{
    EngagementReport, EngagementScope, ReachMatrix, Strike, Zone, engagement_candidates,
    reach_matrix, resolve_engagement,
};
pub use order::{Order, OrderScheduler, TurnSummary, nearest_enemy_within};
pub use reposition::{move_toward, nearest_of, reposition, retreat, weakest_opponent};
