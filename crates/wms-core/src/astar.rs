//! Grid A* search over 4-connected walkable cells.

use crate::error::{PathError, PathViolation, ViolationReason};
use crate::grid::WarehouseGrid;
use crate::models::GridPos;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Uniform cost of one orthogonal step.
const STEP_COST: usize = 1;

/// A shortest path and the work spent finding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    /// Cells from start to goal inclusive.
    pub path: Vec<GridPos>,
    pub nodes_expanded: usize,
}

impl PathResult {
    /// Number of steps walked.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    pos: GridPos,
    g: usize,
    h: usize,
    f: usize,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    // Lowest f first; ties go to the lowest row, then the lowest column.
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then_with(|| self.pos.row.cmp(&other.pos.row))
            .then_with(|| self.pos.col.cmp(&other.pos.col))
            .then_with(|| self.h.cmp(&other.h))
            .then_with(|| self.g.cmp(&other.g))
    }
}

fn heuristic(from: GridPos, goal: GridPos) -> usize {
    from.manhattan(goal)
}

/// Shortest walkable path from `start` to `goal`.
///
/// Both endpoints must be in bounds and traversable; failures are logged and
/// returned rather than searched. The path is checked cell by cell before it is
/// handed back, so a corrupt result surfaces as [`PathError::InvalidPath`].
pub fn find_path(
    grid: &WarehouseGrid,
    start: GridPos,
    goal: GridPos,
) -> Result<PathResult, PathError> {
    for (point, pos) in [("start", start), ("goal", goal)] {
        if !grid.in_bounds(pos) {
            tracing::error!(point, %pos, "endpoint outside grid");
            return Err(PathError::OutOfBounds { point, pos });
        }
    }
    if !grid.is_traversable(start) {
        tracing::error!(%start, "start is an obstacle");
        return Err(PathError::StartBlocked(start));
    }
    if !grid.is_traversable(goal) {
        tracing::error!(%goal, "goal is an obstacle");
        return Err(PathError::GoalBlocked(goal));
    }

    let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
    let mut closed_set: HashSet<GridPos> = HashSet::new();
    let mut g_score: HashMap<GridPos, usize> = HashMap::new();
    let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();

    let h = heuristic(start, goal);
    open_set.push(Reverse(OpenNode {
        pos: start,
        g: 0,
        h,
        f: h,
    }));
    g_score.insert(start, 0);

    let mut nodes_expanded = 0usize;

    while let Some(Reverse(current)) = open_set.pop() {
        if closed_set.contains(&current.pos) {
            continue;
        }
        // Stale heap entry superseded by a cheaper one.
        if g_score.get(&current.pos).is_some_and(|&best| current.g > best) {
            continue;
        }
        closed_set.insert(current.pos);
        nodes_expanded += 1;

        if current.pos == goal {
            let path = reconstruct_path(&came_from, goal);
            let violations = validate_path(grid, &path, false);
            if !violations.is_empty() {
                for violation in &violations {
                    tracing::error!(%violation, "search produced a non-walkable cell");
                }
                tracing::error!(path = ?path, "rejected path");
                return Err(PathError::InvalidPath { violations });
            }
            tracing::trace!(%start, %goal, steps = path.len() - 1, nodes_expanded, "path found");
            return Ok(PathResult {
                path,
                nodes_expanded,
            });
        }

        for next in grid.neighbors_4(current.pos) {
            if closed_set.contains(&next) || !grid.is_traversable(next) {
                continue;
            }
            let tentative_g = current.g + STEP_COST;
            if tentative_g < g_score.get(&next).copied().unwrap_or(usize::MAX) {
                came_from.insert(next, current.pos);
                g_score.insert(next, tentative_g);
                let h = heuristic(next, goal);
                open_set.push(Reverse(OpenNode {
                    pos: next,
                    g: tentative_g,
                    h,
                    f: tentative_g + h,
                }));
            }
        }
    }

    tracing::debug!(%start, %goal, nodes_expanded, "open set exhausted");
    Err(PathError::NoPath {
        from: start,
        to: goal,
    })
}

fn reconstruct_path(came_from: &HashMap<GridPos, GridPos>, goal: GridPos) -> Vec<GridPos> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Every point of `path` that is off the grid or on an obstacle. With
/// `check_steps`, also every point that is not one orthogonal step from its
/// predecessor.
pub fn validate_path(
    grid: &WarehouseGrid,
    path: &[GridPos],
    check_steps: bool,
) -> Vec<PathViolation> {
    let mut violations = Vec::new();
    for (index, &pos) in path.iter().enumerate() {
        let reason = if !grid.in_bounds(pos) {
            Some(ViolationReason::OutOfBounds)
        } else if !grid.is_traversable(pos) {
            Some(ViolationReason::Obstacle)
        } else if check_steps && index > 0 {
            match path[index - 1].manhattan(pos) {
                0 => Some(ViolationReason::DuplicateJunction),
                1 => None,
                _ => Some(ViolationReason::NotAdjacent),
            }
        } else {
            None
        };

        if let Some(reason) = reason {
            let around = grid.neighborhood(pos);
            violations.push(PathViolation {
                index,
                pos,
                reason,
                cell: grid.get(pos),
                up: around.up,
                down: around.down,
                left: around.left,
                right: around.right,
            });
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use crate::layout::WarehouseLayout;
    use crate::models::{Cell, LocationCode, Zone};

    fn open_grid(rows: usize, cols: usize) -> WarehouseGrid {
        WarehouseGrid::new(rows, cols)
    }

    #[test]
    fn straight_line_on_open_floor() {
        let grid = open_grid(5, 5);
        let result = find_path(&grid, GridPos::new(0, 0), GridPos::new(0, 4)).unwrap();
        assert_eq!(result.steps(), 4);
        assert_eq!(
            result.path,
            (0..5).map(|col| GridPos::new(0, col)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn start_equals_goal() {
        let grid = open_grid(3, 3);
        let pos = GridPos::new(1, 1);
        let result = find_path(&grid, pos, pos).unwrap();
        assert_eq!(result.path, vec![pos]);
        assert_eq!(result.nodes_expanded, 1);
    }

    #[test]
    fn detours_around_wall() {
        // . . . . .
        // . # # # .
        // . . S # G
        let mut grid = open_grid(3, 5);
        for pos in [(1, 1), (1, 2), (1, 3), (2, 3)] {
            grid.set(GridPos::new(pos.0, pos.1), Cell::Obstacle);
        }
        let result = find_path(&grid, GridPos::new(2, 2), GridPos::new(2, 4)).unwrap();
        assert_eq!(result.steps(), 10);
        assert!(validate_path(&grid, &result.path, true).is_empty());
    }

    #[test]
    fn walks_through_labels() {
        let mut grid = open_grid(1, 3);
        grid.set(GridPos::new(0, 1), Cell::Label(LocationCode::new(Zone::C, 4)));
        let result = find_path(&grid, GridPos::new(0, 0), GridPos::new(0, 2)).unwrap();
        assert_eq!(result.steps(), 2);
    }

    #[test]
    fn rejects_bad_endpoints() {
        let mut grid = open_grid(3, 3);
        grid.set(GridPos::new(1, 1), Cell::Obstacle);
        assert_eq!(
            find_path(&grid, GridPos::new(1, 1), GridPos::new(0, 0)),
            Err(PathError::StartBlocked(GridPos::new(1, 1)))
        );
        assert_eq!(
            find_path(&grid, GridPos::new(0, 0), GridPos::new(1, 1)),
            Err(PathError::GoalBlocked(GridPos::new(1, 1)))
        );
        assert!(matches!(
            find_path(&grid, GridPos::new(0, 0), GridPos::new(3, 0)),
            Err(PathError::OutOfBounds { point: "goal", .. })
        ));
    }

    #[test]
    fn reports_enclosed_goal() {
        let mut grid = open_grid(3, 3);
        grid.set(GridPos::new(1, 2), Cell::Obstacle);
        grid.set(GridPos::new(2, 1), Cell::Obstacle);
        assert_eq!(
            find_path(&grid, GridPos::new(0, 0), GridPos::new(2, 2)),
            Err(PathError::NoPath {
                from: GridPos::new(0, 0),
                to: GridPos::new(2, 2)
            })
        );
    }

    #[test]
    fn ties_prefer_lower_rows() {
        // Every monotone path is optimal; the pinned tie-break walks the top edge first.
        let grid = open_grid(3, 3);
        let result = find_path(&grid, GridPos::new(0, 0), GridPos::new(2, 2)).unwrap();
        let again = find_path(&grid, GridPos::new(0, 0), GridPos::new(2, 2)).unwrap();
        assert_eq!(result, again);
        assert_eq!(result.path[1], GridPos::new(0, 1));
        assert_eq!(result.steps(), 4);
    }

    #[test]
    fn crosses_rack_band_through_aisle_column() {
        let (grid, _) = build_grid::<&str>(&WarehouseLayout::default(), &[]);
        let result = find_path(&grid, GridPos::new(6, 3), GridPos::new(11, 3)).unwrap();
        // Over the A0-A4 labels to column 0 or 6, down, and back: 3 + 5 + 3.
        assert_eq!(result.steps(), 11);
        assert!(validate_path(&grid, &result.path, true).is_empty());
    }

    #[test]
    fn validation_flags_each_problem() {
        let mut grid = open_grid(2, 3);
        grid.set(GridPos::new(0, 1), Cell::Obstacle);
        let path = [
            GridPos::new(0, 0),
            GridPos::new(0, 0),
            GridPos::new(0, 1),
            GridPos::new(1, 2),
            GridPos::new(5, 5),
        ];
        let reasons: Vec<_> = validate_path(&grid, &path, true)
            .into_iter()
            .map(|violation| (violation.index, violation.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (1, ViolationReason::DuplicateJunction),
                (2, ViolationReason::Obstacle),
                (3, ViolationReason::NotAdjacent),
                (4, ViolationReason::OutOfBounds),
            ]
        );
        assert_eq!(validate_path(&grid, &path, false).len(), 2);
    }
}
