//! Candidate slots around an enemy and the arrangements that fill them.
use arrayvec::ArrayVec;

use crate::config::TacticsConfig;
use crate::state::{Position, UnitId};

pub type Assignments = ArrayVec<(Position, UnitId), { TacticsConfig::MAX_ADJACENT_SLOTS }>;

/// One tile next to an enemy and every allied unit that can stand on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub tile: Position,
    pub units: Vec<UnitId>,
}

/// Adjacent tiles of one enemy that at least one ally can occupy this turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngagementCandidate {
    pub enemy: UnitId,
    pub position: Position,
    pub slots: ArrayVec<Slot, { TacticsConfig::MAX_ADJACENT_SLOTS }>,
}

impl EngagementCandidate {
    pub fn new(enemy: UnitId, position: Position) -> Self {
        Self {
            enemy,
            position,
            slots: ArrayVec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of different units appearing in any slot.
    pub fn distinct_units(&self) -> usize {
        let mut seen: Vec<UnitId> = Vec::new();
        for unit in self.slots.iter().flat_map(|slot| slot.units.iter()) {
            if !seen.contains(unit) {
                seen.push(*unit);
            }
        }
        seen.len()
    }

    /// Highest score any arrangement of this candidate could reach.
    pub fn score_ceiling(&self) -> usize {
        self.distinct_units().min(self.slots.len())
    }

    /// Every way of picking one unit per slot (the Cartesian product of the
    /// slot candidate lists), first slot varying slowest.
    pub fn arrangements(&self) -> Arrangements<'_> {
        Arrangements::new(self)
    }

    /// Total number of arrangements the product yields.
    pub fn arrangement_count(&self) -> usize {
        if self.slots.is_empty() {
            return 0;
        }
        self.slots.iter().map(|slot| slot.units.len()).product()
    }
}

/// One concrete unit per candidate slot around an enemy.
///
/// A unit may fill several slots; it is still only one attacker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrangement {
    pub enemy: UnitId,
    pub target: Position,
    pub assignments: Assignments,
}

impl Arrangement {
    /// Count of distinct units across the assignments.
    pub fn score(&self) -> usize {
        let mut seen: ArrayVec<UnitId, { TacticsConfig::MAX_ADJACENT_SLOTS }> = ArrayVec::new();
        for (_, unit) in &self.assignments {
            if !seen.contains(unit) {
                seen.push(*unit);
            }
        }
        seen.len()
    }

    /// Distinct units in assignment order.
    pub fn units(&self) -> Vec<UnitId> {
        let mut units = Vec::new();
        for (_, unit) in &self.assignments {
            if !units.contains(unit) {
                units.push(*unit);
            }
        }
        units
    }
}

/// Odometer over slot indices. The product is bounded by at most four slots,
/// so no recursion or cutoff is needed.
#[derive(Debug)]
pub struct Arrangements<'a> {
    candidate: &'a EngagementCandidate,
    cursor: ArrayVec<usize, { TacticsConfig::MAX_ADJACENT_SLOTS }>,
    exhausted: bool,
}

impl<'a> Arrangements<'a> {
    fn new(candidate: &'a EngagementCandidate) -> Self {
        let exhausted = candidate.slots.is_empty()
            || candidate.slots.iter().any(|slot| slot.units.is_empty());
        Self {
            candidate,
            cursor: candidate.slots.iter().map(|_| 0).collect(),
            exhausted,
        }
    }

    fn advance(&mut self) {
        for position in (0..self.cursor.len()).rev() {
            self.cursor[position] += 1;
            if self.cursor[position] < self.candidate.slots[position].units.len() {
                return;
            }
            self.cursor[position] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for Arrangements<'_> {
    type Item = Arrangement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let assignments = self
            .candidate
            .slots
            .iter()
            .zip(&self.cursor)
            .map(|(slot, &choice)| (slot.tile, slot.units[choice]))
            .collect();
        self.advance();
        Some(Arrangement {
            enemy: self.candidate.enemy,
            target: self.candidate.position,
            assignments,
        })
    }
}

/// Picks the highest-scoring arrangement over all candidates.
///
/// A later arrangement replaces the current best only when its score is
/// strictly greater, so the first one found wins ties. Enumeration of a
/// candidate stops early once nothing left in it can beat the best so far.
pub fn select_best(candidates: &[EngagementCandidate]) -> Option<Arrangement> {
    let mut best: Option<Arrangement> = None;
    let mut best_score = 0;

    for candidate in candidates {
        let ceiling = candidate.score_ceiling();
        if ceiling <= best_score {
            continue;
        }
        for arrangement in candidate.arrangements() {
            let score = arrangement.score();
            if score > best_score {
                best_score = score;
                best = Some(arrangement);
            }
            if score == ceiling {
                break;
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(enemy: u32, slots: &[(i32, i32, &[u32])]) -> EngagementCandidate {
        let mut candidate = EngagementCandidate::new(UnitId(enemy), Position::new(10, 10));
        for (x, y, units) in slots {
            candidate.slots.push(Slot {
                tile: Position::new(*x, *y),
                units: units.iter().map(|id| UnitId(*id)).collect(),
            });
        }
        candidate
    }

    #[test]
    fn enumerates_the_full_product() {
        let candidate = candidate(9, &[(0, 0, &[1, 2]), (1, 0, &[3]), (2, 0, &[4, 5, 6])]);
        let all: Vec<_> = candidate.arrangements().collect();
        assert_eq!(all.len(), 6);
        assert_eq!(candidate.arrangement_count(), 6);

        let first: Vec<_> = all[0].assignments.iter().map(|(_, unit)| unit.0).collect();
        let second: Vec<_> = all[1].assignments.iter().map(|(_, unit)| unit.0).collect();
        let last: Vec<_> = all[5].assignments.iter().map(|(_, unit)| unit.0).collect();
        assert_eq!(first, vec![1, 3, 4]);
        assert_eq!(second, vec![1, 3, 5]);
        assert_eq!(last, vec![2, 3, 6]);
    }

    #[test]
    fn score_counts_each_unit_once() {
        let candidate = candidate(9, &[(0, 0, &[1]), (1, 0, &[1])]);
        let only = candidate.arrangements().next().expect("one arrangement");
        assert_eq!(only.assignments.len(), 2);
        assert_eq!(only.score(), 1);
        assert_eq!(only.units(), vec![UnitId(1)]);
    }

    #[test]
    fn two_shared_candidates_fill_two_slots() {
        let candidate = candidate(9, &[(0, 0, &[1, 2]), (1, 0, &[1, 2])]);
        let best = select_best(&[candidate]).expect("viable");
        assert_eq!(best.score(), 2);
        assert_eq!(best.units(), vec![UnitId(1), UnitId(2)]);
    }

    #[test]
    fn first_found_wins_ties_across_enemies() {
        let a = candidate(7, &[(0, 0, &[1]), (1, 0, &[2])]);
        let b = candidate(8, &[(5, 5, &[3]), (6, 5, &[4])]);
        let best = select_best(&[a, b]).expect("viable");
        assert_eq!(best.enemy, UnitId(7));
    }

    #[test]
    fn strictly_better_enemy_replaces_earlier_one() {
        let a = candidate(7, &[(0, 0, &[1])]);
        let b = candidate(8, &[(5, 5, &[1, 2]), (6, 5, &[2, 3]), (5, 6, &[3])]);
        let best = select_best(&[a, b]).expect("viable");
        assert_eq!(best.enemy, UnitId(8));
        assert_eq!(best.score(), 3);
    }

    #[test]
    fn empty_candidates_select_nothing() {
        assert_eq!(select_best(&[]), None);
        let empty = EngagementCandidate::new(UnitId(1), Position::ORIGIN);
        assert_eq!(empty.arrangements().count(), 0);
        assert_eq!(select_best(&[empty]), None);
    }
}
