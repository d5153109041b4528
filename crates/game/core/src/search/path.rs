use crate::state::{Direction, Position};

use super::CostField;

/// Rebuilds a route from the field's origin to `target` without parent
/// pointers.
///
/// Starting at the target, each step moves to the neighbour with the strictly
/// lowest recorded cost, checking neighbours in [`Direction::SCAN_ORDER`] so
/// the first one wins ties. Because a tile's entry cost is the same whichever
/// side it is entered from, the lowest neighbour is always a valid
/// predecessor and the result is a minimal-cost path, though not necessarily
/// the one the search first found.
///
/// Returns `None` when the target is not within the movement range.
pub fn descend(field: &CostField, target: Position) -> Option<Vec<Position>> {
    if !field.is_reachable(target) {
        return None;
    }

    let origin = field.origin();
    let mut path = vec![target];
    let mut current = target;
    let mut current_cost = field.cost(target)?;

    while current != origin {
        let mut best: Option<(Position, u32)> = None;
        for direction in Direction::SCAN_ORDER {
            let neighbor = current.step(direction);
            let Some(cost) = field.cost(neighbor) else {
                continue;
            };
            // zero-cost terrain can produce plateaus; never step back onto the path
            if path.contains(&neighbor) {
                continue;
            }
            if best.is_none_or(|(_, lowest)| cost < lowest) {
                best = Some((neighbor, cost));
            }
        }

        let (next, cost) = best?;
        if cost > current_cost {
            return None;
        }
        path.push(next);
        current = next;
        current_cost = cost;
    }

    path.reverse();
    Some(path)
}
