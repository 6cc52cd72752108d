//! Occupancy grid construction.

use crate::layout::{WarehouseLayout, ZONE_BAND_ROWS};
use crate::models::{Cell, GridPos, LocationCode, Zone};
use std::collections::HashMap;

/// Requested location strings mapped to their grid cells.
pub type LocationMap = HashMap<String, GridPos>;

/// Dense row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

/// The four orthogonal neighbours of a cell, `None` where the grid ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    pub up: Option<Cell>,
    pub down: Option<Cell>,
    pub left: Option<Cell>,
    pub right: Option<Cell>,
}

impl WarehouseGrid {
    /// An all-aisle grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Aisle; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn get(&self, pos: GridPos) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    pub fn set(&mut self, pos: GridPos, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[pos.row * self.cols + pos.col] = cell;
        }
    }

    /// In bounds and not an obstacle.
    pub fn is_traversable(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|cell| cell.is_traversable())
    }

    pub fn is_aisle(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|cell| cell.is_aisle())
    }

    /// In-bounds orthogonal neighbours in up, down, left, right order.
    pub fn neighbors_4(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        let up = pos.row.checked_sub(1).map(|row| GridPos::new(row, pos.col));
        let down = Some(GridPos::new(pos.row + 1, pos.col));
        let left = pos.col.checked_sub(1).map(|col| GridPos::new(pos.row, col));
        let right = Some(GridPos::new(pos.row, pos.col + 1));
        [up, down, left, right]
            .into_iter()
            .flatten()
            .filter(move |next| self.in_bounds(*next))
    }

    pub fn neighborhood(&self, pos: GridPos) -> Neighborhood {
        let at = |row: Option<usize>, col: Option<usize>| match (row, col) {
            (Some(row), Some(col)) => self.get(GridPos::new(row, col)),
            _ => None,
        };
        Neighborhood {
            up: at(pos.row.checked_sub(1), Some(pos.col)),
            down: at(pos.row.checked_add(1), Some(pos.col)),
            left: at(Some(pos.row), pos.col.checked_sub(1)),
            right: at(Some(pos.row), pos.col.checked_add(1)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (GridPos::new(idx / self.cols, idx % self.cols), *cell))
    }

    /// Text rendering with an optional path overlay.
    ///
    /// `.` aisle, `#` obstacle, `L` rack label, `*` path, `S` and `E` for the
    /// first and last path cells.
    pub fn render_ascii(&self, path: &[GridPos]) -> String {
        let mut canvas: Vec<Vec<char>> = (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| self.cells[row * self.cols + col].symbol())
                    .collect()
            })
            .collect();
        for pos in path.iter().filter(|pos| self.in_bounds(**pos)) {
            canvas[pos.row][pos.col] = '*';
        }
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            if self.in_bounds(*first) {
                canvas[first.row][first.col] = 'S';
            }
            if self.in_bounds(*last) {
                canvas[last.row][last.col] = 'E';
            }
        }
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for line in canvas {
            out.extend(line);
            out.push('\n');
        }
        out
    }
}

/// Build the occupancy grid for a layout and locate each requested code.
///
/// Codes that do not parse, or that name a block the layout does not have, are
/// left out of the map.
pub fn build_grid<S: AsRef<str>>(
    layout: &WarehouseLayout,
    locations: &[S],
) -> (WarehouseGrid, LocationMap) {
    let mut grid = WarehouseGrid::new(layout.rows, layout.cols);

    for zone in Zone::ALL {
        let base_row = layout.zone_rows[zone.index()];
        let back_row = base_row + ZONE_BAND_ROWS - 1;

        for block in 0..layout.blocks_per_zone() as u32 {
            let code = LocationCode::new(zone, block);
            if let Some(pos) = layout.position_of(code) {
                grid.set(pos, Cell::Label(code));
            }
        }

        for row in base_row + 1..back_row {
            for col in (0..layout.cols).filter(|col| !layout.is_aisle_col(*col)) {
                grid.set(GridPos::new(row, col), Cell::Obstacle);
            }
        }
    }

    for &pos in &layout.blocked_cells {
        if !layout.is_aisle_col(pos.col) {
            grid.set(pos, Cell::Obstacle);
        }
    }

    let mut location_map = LocationMap::new();
    for location in locations {
        let location = location.as_ref();
        match location.parse::<LocationCode>() {
            Ok(code) => match layout.position_of(code) {
                Some(pos) => {
                    location_map.insert(location.to_string(), pos);
                }
                None => tracing::debug!(location, "block outside layout, not mapped"),
            },
            Err(err) => tracing::debug!(location, %err, "unparsable location, not mapped"),
        }
    }

    (grid, location_map)
}
