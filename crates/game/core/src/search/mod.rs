//! Grid searches backing reachability, pathing and attack geometry.
//!
//! - [`CostField`]: bounded uniform-cost search from a unit's tile
//! - [`descend`]: path reconstruction by greedy descent over a cost field
//! - [`attack_disk`]: tiles a unit can strike from where it stands
mod field;
mod geometry;
mod path;

pub use field::CostField;
pub use geometry::attack_disk;
pub use path::descend;
