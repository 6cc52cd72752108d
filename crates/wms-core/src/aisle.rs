//! Nearest walkable aisle lookup.

use crate::grid::WarehouseGrid;
use crate::models::GridPos;
use std::collections::{HashSet, VecDeque};

/// Find the aisle cell with the fewest orthogonal steps from `start`.
///
/// Returns `start` itself when it is an aisle. Otherwise the search spreads through
/// traversable cells (aisles and rack labels) and never through obstacles or off the
/// grid. `None` when every route out of `start` is walled in.
pub fn find_nearest_aisle(grid: &WarehouseGrid, start: GridPos) -> Option<GridPos> {
    if grid.is_aisle(start) {
        return Some(start);
    }

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);

    while let Some(current) = queue.pop_front() {
        for next in grid.neighbors_4(current) {
            if !visited.insert(next) {
                continue;
            }
            if grid.is_aisle(next) {
                return Some(next);
            }
            if grid.is_traversable(next) {
                queue.push_back(next);
            }
        }
    }

    tracing::debug!(%start, explored = visited.len(), "no aisle reachable");
    None
}
