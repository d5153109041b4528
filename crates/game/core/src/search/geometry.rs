use crate::config::TacticsConfig;
use crate::env::Grid;
use crate::state::Position;

/// Tiles within Manhattan distance `1..=range` of `origin` that exist on the
/// grid, scanned row by row from the north-west.
///
/// No occupancy or line-of-sight filtering happens here. A melee unit
/// (`range == 1`) gets exactly the axis-adjacent tiles. The scan never reaches
/// past the grid's width plus height, whatever the range.
pub fn attack_disk(grid: &Grid, origin: Position, range: u32) -> Vec<Position> {
    let dimensions = grid.dimensions();
    let extent = dimensions.width.saturating_add(dimensions.height);
    let reach = range.min(extent).min(TacticsConfig::MAX_RANGE) as i32;
    let mut tiles = Vec::new();
    for dy in -reach..=reach {
        let span = reach - dy.abs();
        for dx in -span..=span {
            if dx == 0 && dy == 0 {
                continue;
            }
            let position = Position::new(origin.x + dx, origin.y + dy);
            if grid.contains(position) {
                tiles.push(position);
            }
        }
    }
    tiles
}
