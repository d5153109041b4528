use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::config::TacticsConfig;
use crate::env::{Grid, MovementProfile};
use crate::state::{Direction, Position};

/// Bounded uniform-cost map around a unit, valid for one turn.
///
/// The buffer is a square of side `2R + 1` centred on the origin, where `R`
/// is the movement range clipped to the grid's longer side, so a huge range
/// never allocates more than the grid can hold. Each cell is either unvisited (`None`) or holds
/// the cumulative cost of the cheapest route found from the origin. The
/// origin always costs 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostField {
    origin: Position,
    range: u32,
    /// Half-side of the buffer square.
    radius: u32,
    turn: u64,
    costs: Vec<Option<u32>>,
    /// Cell indices in the order they first received a cost.
    discovered: Vec<usize>,
}

impl CostField {
    /// Runs a uniform-cost search from `origin` across the `2R + 1` square.
    ///
    /// `is_blocked` reports tiles held by a living unit of another faction;
    /// entering one costs [`TacticsConfig::BLOCKED_COST`] whatever the terrain.
    /// Terrain missing from `profile` is never entered. Ranges above
    /// [`TacticsConfig::MAX_RANGE`] are treated as that cap.
    ///
    /// The frontier pops the lowest cost first and, among equal costs, the
    /// cell that comes first in row-major scan order of the square. Neighbours
    /// are relaxed in [`Direction::SCAN_ORDER`].
    pub fn compute<F>(
        grid: &Grid,
        profile: &MovementProfile,
        origin: Position,
        range: u32,
        turn: u64,
        is_blocked: F,
    ) -> Self
    where
        F: Fn(Position) -> bool,
    {
        let range = range.min(TacticsConfig::MAX_RANGE);
        let dimensions = grid.dimensions();
        let radius = range.min(dimensions.width.max(dimensions.height));
        let side = (2 * radius + 1) as usize;
        let mut field = Self {
            origin,
            range,
            radius,
            turn,
            costs: vec![None; side * side],
            discovered: Vec::new(),
        };

        let Some(start) = field.index(origin) else {
            return field;
        };
        field.costs[start] = Some(0);
        field.discovered.push(start);

        let mut finalized = vec![false; side * side];
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((0u32, start)));

        while let Some(Reverse((cost, index))) = frontier.pop() {
            if finalized[index] || field.costs[index] != Some(cost) {
                continue;
            }
            finalized[index] = true;

            let current = field.position(index);
            for direction in Direction::SCAN_ORDER {
                let neighbor = current.step(direction);
                let Some(neighbor_index) = field.index(neighbor) else {
                    continue;
                };
                if finalized[neighbor_index] {
                    continue;
                }
                let Some(terrain) = grid.terrain(neighbor) else {
                    continue;
                };

                let edge = if is_blocked(neighbor) {
                    TacticsConfig::BLOCKED_COST
                } else {
                    match profile.cost(terrain) {
                        Some(edge) => edge,
                        None => continue,
                    }
                };

                let candidate = cost.saturating_add(edge);
                match field.costs[neighbor_index] {
                    Some(recorded) if recorded <= candidate => {}
                    previous => {
                        if previous.is_none() {
                            field.discovered.push(neighbor_index);
                        }
                        field.costs[neighbor_index] = Some(candidate);
                        frontier.push(Reverse((candidate, neighbor_index)));
                    }
                }
            }
        }

        field
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Side length of the square buffer.
    pub fn side(&self) -> u32 {
        2 * self.radius + 1
    }

    /// Recorded cost at `position`; `None` if unvisited or outside the square.
    pub fn cost(&self, position: Position) -> Option<u32> {
        self.index(position).and_then(|index| self.costs[index])
    }

    pub fn is_reachable(&self, position: Position) -> bool {
        self.cost(position).is_some_and(|cost| cost <= self.range)
    }

    /// Tiles whose final cost fits the movement range, in discovery order.
    /// The origin is always first.
    pub fn reachable(&self) -> Vec<Position> {
        self.discovered
            .iter()
            .filter(|&&index| self.costs[index].is_some_and(|cost| cost <= self.range))
            .map(|&index| self.position(index))
            .collect()
    }

    fn index(&self, position: Position) -> Option<usize> {
        let radius = i64::from(self.radius);
        let local_x = i64::from(position.x) - i64::from(self.origin.x) + radius;
        let local_y = i64::from(position.y) - i64::from(self.origin.y) + radius;
        let side = 2 * radius + 1;
        if local_x < 0 || local_y < 0 || local_x >= side || local_y >= side {
            return None;
        }
        Some((local_y * side + local_x) as usize)
    }

    fn position(&self, index: usize) -> Position {
        let side = self.side() as usize;
        let radius = self.radius as i32;
        Position::new(
            self.origin.x + (index % side) as i32 - radius,
            self.origin.y + (index / side) as i32 - radius,
        )
    }
}
