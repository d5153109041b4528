//! Greedy repositioning for units the engagement resolver left idle.
//!
//! None of these searches: each picks from the unit's reachable tiles in
//! discovery order and moves at most once.
use crate::battle::{Battlefield, TurnEnv};
use crate::state::{FactionId, Position, UnitId};

/// Opposing faction with the fewest living units; lower ids win ties.
pub fn weakest_opponent(battlefield: &Battlefield, faction: FactionId) -> Option<FactionId> {
    battlefield
        .factions()
        .filter(|&other| other != faction)
        .filter_map(|other| {
            let living = battlefield.roster(other)?.living_count();
            (living > 0).then_some((living, other))
        })
        .min()
        .map(|(_, other)| other)
}

/// Living unit of `faction` nearest to `from` by squared distance.
pub fn nearest_of(battlefield: &Battlefield, faction: FactionId, from: Position) -> Option<Position> {
    battlefield
        .roster(faction)?
        .living()
        .map(|unit| unit.position)
        .min_by_key(|position| from.distance_squared(*position))
}

/// Squared distance from `from` to the nearest living unit hostile to `faction`.
fn nearest_enemy_distance(battlefield: &Battlefield, faction: FactionId, from: Position) -> Option<u64> {
    battlefield
        .enemies_of(faction)
        .into_iter()
        .filter_map(|id| battlefield.unit(id))
        .map(|unit| from.distance_squared(unit.position))
        .min()
}

/// Reachable tiles the unit could actually stop on, in discovery order.
fn standable_tiles(battlefield: &mut Battlefield, id: UnitId) -> Vec<Position> {
    battlefield
        .reachable_tiles(id)
        .into_iter()
        .filter(|&tile| {
            battlefield
                .occupant(tile)
                .is_none_or(|occupant| occupant.id == id)
        })
        .collect()
}

fn commit_move(
    battlefield: &mut Battlefield,
    id: UnitId,
    origin: Position,
    destination: Position,
    env: &mut TurnEnv<'_>,
) -> bool {
    match battlefield.move_unit(id, destination, env) {
        Ok(_) => destination != origin,
        Err(error) => {
            tracing::debug!(unit = %id, %destination, %error, "reposition skipped");
            false
        }
    }
}

/// Fallback for idle units: step toward the weakest opposing faction.
///
/// Each unit takes the first standable tile strictly closer to that faction's
/// nearest living unit, or else the first standable tile at all, which is its
/// own tile and so holds position. Returns how many units changed tiles.
pub fn reposition(battlefield: &mut Battlefield, units: &[UnitId], env: &mut TurnEnv<'_>) -> usize {
    let mut relocated = 0;
    for &id in units {
        let Some(unit) = battlefield.unit(id).filter(|unit| unit.can_move()) else {
            continue;
        };
        let (faction, origin) = (unit.faction, unit.position);
        let Some(anchor) = weakest_opponent(battlefield, faction)
            .and_then(|weakest| nearest_of(battlefield, weakest, origin))
        else {
            continue;
        };

        let current = origin.distance_squared(anchor);
        let tiles = standable_tiles(battlefield, id);
        let Some(destination) = tiles
            .iter()
            .copied()
            .find(|tile| tile.distance_squared(anchor) < current)
            .or_else(|| tiles.first().copied())
        else {
            continue;
        };

        tracing::trace!(unit = %id, %anchor, %destination, "fallback reposition");
        if commit_move(battlefield, id, origin, destination, env) {
            relocated += 1;
        }
    }
    relocated
}

/// Moves the unit to the standable tile nearest `point`, but only when that is
/// strictly closer than where it stands. First found wins ties.
pub fn move_toward(
    battlefield: &mut Battlefield,
    id: UnitId,
    point: Position,
    env: &mut TurnEnv<'_>,
) -> bool {
    let Some(origin) = battlefield
        .unit(id)
        .filter(|unit| unit.can_move())
        .map(|unit| unit.position)
    else {
        return false;
    };

    let mut best = (origin.distance_squared(point), origin);
    for tile in standable_tiles(battlefield, id) {
        let distance = tile.distance_squared(point);
        if distance < best.0 {
            best = (distance, tile);
        }
    }
    best.1 != origin && commit_move(battlefield, id, origin, best.1, env)
}

/// Moves the unit to the standable tile farthest from its nearest enemy, but
/// only when that is strictly farther than where it stands.
pub fn retreat(battlefield: &mut Battlefield, id: UnitId, env: &mut TurnEnv<'_>) -> bool {
    let Some((faction, origin)) = battlefield
        .unit(id)
        .filter(|unit| unit.can_move())
        .map(|unit| (unit.faction, unit.position))
    else {
        return false;
    };
    let Some(current) = nearest_enemy_distance(battlefield, faction, origin) else {
        return false;
    };

    let mut best = (current, origin);
    for tile in standable_tiles(battlefield, id) {
        let distance = nearest_enemy_distance(battlefield, faction, tile).unwrap_or(current);
        if distance > best.0 {
            best = (distance, tile);
        }
    }
    best.1 != origin && commit_move(battlefield, id, origin, best.1, env)
}
