//! Route planning failures.

use crate::layout::LayoutError;
use crate::models::{Cell, GridPos};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// How many offending points an invariant report keeps.
pub const MAX_VIOLATION_SAMPLES: usize = 10;

/// Why a path point is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    OutOfBounds,
    Obstacle,
    NotAdjacent,
    DuplicateJunction,
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViolationReason::OutOfBounds => "out of bounds",
            ViolationReason::Obstacle => "obstacle",
            ViolationReason::NotAdjacent => "not adjacent to previous point",
            ViolationReason::DuplicateJunction => "repeats previous point",
        })
    }
}

/// One offending point in a computed path, with the cells around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathViolation {
    pub index: usize,
    pub pos: GridPos,
    pub reason: ViolationReason,
    pub cell: Option<Cell>,
    pub up: Option<Cell>,
    pub down: Option<Cell>,
    pub left: Option<Cell>,
    pub right: Option<Cell>,
}

impl fmt::Display for PathViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |cell: Option<Cell>| cell.map_or_else(|| "N/A".to_string(), |c| c.to_string());
        write!(
            f,
            "#{} {} {} (cell={}, up={}, down={}, left={}, right={})",
            self.index,
            self.pos,
            self.reason,
            show(self.cell),
            show(self.up),
            show(self.down),
            show(self.left),
            show(self.right),
        )
    }
}

fn summarize(samples: &[PathViolation]) -> String {
    samples
        .iter()
        .take(3)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn first_pos(samples: &[PathViolation]) -> String {
    samples
        .first()
        .map_or_else(|| "?".to_string(), |violation| violation.pos.to_string())
}

/// A* search failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{point} {pos} is outside the grid")]
    OutOfBounds { point: &'static str, pos: GridPos },
    #[error("start {0} is an obstacle")]
    StartBlocked(GridPos),
    #[error("goal {0} is an obstacle")]
    GoalBlocked(GridPos),
    #[error("no path from {from} to {to}")]
    NoPath { from: GridPos, to: GridPos },
    #[error("computed path crosses {} invalid point(s): {}", .violations.len(), summarize(.violations))]
    InvalidPath { violations: Vec<PathViolation> },
}

/// Fatal route planning failure. No partial route accompanies it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid warehouse layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("{point} {pos} is blocked and no aisle can be reached from it")]
    Configuration { point: &'static str, pos: GridPos },

    #[error("cannot reach location {location}: no walkable path from {from} to {to}")]
    UnreachableLocation {
        location: String,
        from: GridPos,
        to: GridPos,
    },

    #[error("cannot reach location {location}: no aisle can be reached from its cell {cell}")]
    LocationWalledIn { location: String, cell: GridPos },

    #[error("cannot reach exit: no walkable path from {from} to {to}")]
    UnreachableExit { from: GridPos, to: GridPos },

    #[error(
        "route crosses {total} invalid point(s), first at {}: {}",
        first_pos(.samples),
        summarize(.samples)
    )]
    InvariantViolation {
        total: usize,
        samples: Vec<PathViolation>,
    },
}

impl RouteError {
    /// Stable machine-readable kind for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteError::Layout(_) => "layout",
            RouteError::Configuration { .. } => "configuration",
            RouteError::UnreachableLocation { .. } | RouteError::LocationWalledIn { .. } => {
                "unreachable_location"
            }
            RouteError::UnreachableExit { .. } => "unreachable_exit",
            RouteError::InvariantViolation { .. } => "invariant_violation",
        }
    }
}
