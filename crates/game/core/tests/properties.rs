use std::collections::BTreeMap;

use tactics_core::{
    Battlefield, EngagementScope, FactionId, Grid, GridDimensions, MovementProfile, Position,
    RecordingSink, StrengthCombat, TacticalEvent, TerrainKind, TurnEnv, UnitId, UnitTemplate,
};

const ALLY: FactionId = FactionId(0);
const FOE: FactionId = FactionId(1);

fn template(range: u32) -> UnitTemplate {
    UnitTemplate::new(MovementProfile::ground(), range, 1).with_max_health(10)
}

fn open(width: u32, height: u32) -> Battlefield {
    Battlefield::new(Grid::new(
        GridDimensions::new(width, height),
        TerrainKind::Open,
    ))
}

/// 9x9 field with every terrain class sprinkled around the centre.
fn rugged() -> Battlefield {
    let mut grid = Grid::new(GridDimensions::new(9, 9), TerrainKind::Open);
    let features = [
        (3, 4, TerrainKind::RoughHigh),
        (4, 3, TerrainKind::RoughLow),
        (5, 4, TerrainKind::Hill),
        (4, 5, TerrainKind::Water),
        (2, 2, TerrainKind::Wall),
        (6, 6, TerrainKind::RoughLow),
        (5, 2, TerrainKind::Hill),
        (3, 6, TerrainKind::RoughHigh),
    ];
    for (x, y, terrain) in features {
        grid.set_terrain(Position::new(x, y), terrain)
            .expect("in bounds");
    }
    Battlefield::new(grid)
}

#[test]
fn reachable_tiles_stay_within_range() {
    let mut field = rugged();
    let centre = Position::new(4, 4);
    let id = field.spawn(ALLY, &template(4), centre).expect("open tile");

    let reachable = field.reachable_tiles(id);
    assert_eq!(reachable.first(), Some(&centre));
    assert_eq!(field.cost_to(id, centre), Some(0));
    for tile in &reachable {
        let cost = field.cost_to(id, *tile).expect("reachable tiles have a cost");
        assert!(cost <= 4, "{tile} costs {cost}");
    }
    assert!(!reachable.contains(&Position::new(4, 5)), "water is impassable on foot");
    assert!(!reachable.contains(&Position::new(2, 2)), "walls are impassable");
}

#[test]
fn paths_are_connected_and_cost_monotone() {
    let mut field = rugged();
    let centre = Position::new(4, 4);
    let id = field.spawn(ALLY, &template(5), centre).expect("open tile");

    for target in field.reachable_tiles(id) {
        let path = field.path_to(id, target).expect("reachable target has a path");
        assert_eq!(path.first(), Some(&centre));
        assert_eq!(path.last(), Some(&target));

        let mut previous = 0;
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        for step in &path {
            let cost = field.cost_to(id, *step).expect("path tiles have a cost");
            assert!(cost >= previous);
            previous = cost;
        }
        assert_eq!(Some(previous), field.cost_to(id, target));
    }
}

#[test]
fn uniform_paths_have_length_equal_to_cost() {
    let mut field = open(7, 7);
    let id = field
        .spawn(ALLY, &template(3), Position::new(3, 3))
        .expect("open tile");

    for target in field.reachable_tiles(id) {
        let path = field.path_to(id, target).expect("reachable");
        let cost = field.cost_to(id, target).expect("reachable");
        assert_eq!(path.len() as u32 - 1, cost);
    }
}

#[test]
fn enemy_tiles_are_never_reachable() {
    let mut field = open(7, 7);
    let mover = field
        .spawn(ALLY, &template(4), Position::new(3, 3))
        .expect("open tile");
    let enemies: Vec<Position> = [(3, 2), (4, 3), (1, 1), (5, 5)]
        .into_iter()
        .map(|(x, y)| Position::new(x, y))
        .collect();
    for &position in &enemies {
        field.spawn(FOE, &template(1), position).expect("open tile");
    }

    let reachable = field.reachable_tiles(mover);
    for position in enemies {
        assert!(!reachable.contains(&position), "{position} is held by a foe");
        assert_eq!(field.path_to(mover, position), None);
    }
}

#[test]
fn boxed_in_unit_reaches_only_itself() {
    let mut field = open(5, 5);
    let centre = Position::new(2, 2);
    let id = field.spawn(ALLY, &template(3), centre).expect("open tile");
    for neighbor in [(1, 2), (2, 1), (3, 2), (2, 3)] {
        field
            .spawn(FOE, &template(1), Position::new(neighbor.0, neighbor.1))
            .expect("open tile");
    }

    assert_eq!(field.reachable_tiles(id), vec![centre]);
}

#[test]
fn engagement_never_double_commits_a_unit() {
    let mut field = open(9, 9);
    let enemy = field
        .spawn(FOE, &template(1), Position::new(4, 4))
        .expect("open tile");
    let own: Vec<UnitId> = [(2, 4), (4, 2), (3, 3), (6, 6), (1, 1)]
        .into_iter()
        .map(|(x, y)| {
            field
                .spawn(ALLY, &template(3), Position::new(x, y))
                .expect("open tile")
        })
        .collect();
    let mut combat = StrengthCombat;
    let mut sink = RecordingSink::new();
    let mut env = TurnEnv::new(&mut combat, &mut sink);

    let report = field
        .resolve_engagement(&own, &[enemy], &EngagementScope::All, &mut env)
        .expect("viable engagement");

    assert_eq!(report.score(), report.arrangement.units().len());
    assert_eq!(report.score(), 4);

    let mut moves: BTreeMap<UnitId, usize> = BTreeMap::new();
    let mut strikes: BTreeMap<UnitId, usize> = BTreeMap::new();
    for event in sink.events() {
        match event {
            TacticalEvent::Moved { unit, .. } => *moves.entry(*unit).or_default() += 1,
            TacticalEvent::Attacked { attacker, .. } => *strikes.entry(*attacker).or_default() += 1,
            _ => {}
        }
    }
    assert!(moves.values().all(|&count| count == 1));
    assert!(strikes.values().all(|&count| count == 1));
    assert_eq!(strikes.len(), 4);
}

#[test]
fn engagement_with_an_empty_side_mutates_nothing() {
    let mut field = open(5, 5);
    let ally = field
        .spawn(ALLY, &template(3), Position::new(0, 0))
        .expect("open tile");
    let foe = field
        .spawn(FOE, &template(3), Position::new(2, 0))
        .expect("open tile");
    let before: Vec<_> = [ally, foe]
        .iter()
        .map(|&id| field.unit(id).cloned().expect("spawned"))
        .collect();
    let mut combat = StrengthCombat;
    let mut sink = RecordingSink::new();
    let mut env = TurnEnv::new(&mut combat, &mut sink);

    assert!(field
        .resolve_engagement(&[], &[foe], &EngagementScope::All, &mut env)
        .is_none());
    assert!(field
        .resolve_engagement(&[ally], &[], &EngagementScope::All, &mut env)
        .is_none());

    for unit in before {
        let after = field.unit(unit.id).expect("still there");
        assert_eq!(after.position, unit.position);
        assert_eq!(after.budget, unit.budget);
        assert_eq!(after.health, unit.health);
    }
    assert!(sink.events().is_empty());
}

#[test]
fn corner_enemy_with_two_candidates_scores_two() {
    let mut field = open(6, 6);
    let enemy = field
        .spawn(FOE, &template(1), Position::new(5, 5))
        .expect("open tile");
    let a = field
        .spawn(ALLY, &template(2), Position::new(4, 3))
        .expect("open tile");
    let b = field
        .spawn(ALLY, &template(2), Position::new(3, 4))
        .expect("open tile");
    let mut combat = StrengthCombat;
    let mut sink = RecordingSink::new();
    let mut env = TurnEnv::new(&mut combat, &mut sink);

    let report = field
        .resolve_engagement(&[a, b], &[enemy], &EngagementScope::All, &mut env)
        .expect("viable engagement");

    assert_eq!(report.score(), 2);
    assert_eq!(sink.attacks(), 2);
}
