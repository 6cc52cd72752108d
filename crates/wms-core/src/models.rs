//! Core data models for warehouse route planning.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A cell coordinate in the warehouse grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance, the exact walking distance on an open 4-connected grid.
    pub fn manhattan(&self, other: GridPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// Rack zone. Each zone owns one band of four grid rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    A,
    B,
    C,
    D,
    E,
}

impl Zone {
    pub const COUNT: usize = 5;
    pub const ALL: [Zone; Zone::COUNT] = [Zone::A, Zone::B, Zone::C, Zone::D, Zone::E];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Case-insensitive lookup by zone letter.
    pub fn from_letter(letter: char) -> Option<Zone> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Zone::A),
            'B' => Some(Zone::B),
            'C' => Some(Zone::C),
            'D' => Some(Zone::D),
            'E' => Some(Zone::E),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationParseError {
    #[error("location code is empty")]
    Empty,
    #[error("unknown zone '{0}' (expected A-E)")]
    UnknownZone(char),
    #[error("invalid block number '{0}'")]
    InvalidBlock(String),
}

/// A rack storage slot such as `A12`: zone letter followed by a block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationCode {
    pub zone: Zone,
    pub block: u32,
}

impl LocationCode {
    pub fn new(zone: Zone, block: u32) -> Self {
        Self { zone, block }
    }
}

impl FromStr for LocationCode {
    type Err = LocationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(LocationParseError::Empty)?;
        let zone = Zone::from_letter(letter).ok_or(LocationParseError::UnknownZone(letter))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LocationParseError::InvalidBlock(digits.to_string()));
        }
        let block = digits
            .parse::<u32>()
            .map_err(|_| LocationParseError::InvalidBlock(digits.to_string()))?;
        Ok(Self { zone, block })
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.zone.letter(), self.block)
    }
}

/// Grid cell contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// Walkable floor.
    Aisle,
    /// Rack structure.
    Obstacle,
    /// Rack face holding a storage slot. Walkable.
    Label(LocationCode),
}

impl Cell {
    pub fn is_traversable(&self) -> bool {
        !matches!(self, Cell::Obstacle)
    }

    pub fn is_aisle(&self) -> bool {
        matches!(self, Cell::Aisle)
    }

    pub fn symbol(&self) -> char {
        match self {
            Cell::Aisle => '.',
            Cell::Obstacle => '#',
            Cell::Label(_) => 'L',
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Aisle => f.write_str("o"),
            Cell::Obstacle => f.write_str("x"),
            Cell::Label(code) => fmt::Display::fmt(code, f),
        }
    }
}

/// A stop on the planned route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub location_label: String,
    pub row: usize,
    pub col: usize,
}

impl Waypoint {
    pub fn new(location_label: impl Into<String>, pos: GridPos) -> Self {
        Self {
            location_label: location_label.into(),
            row: pos.row,
            col: pos.col,
        }
    }

    pub fn pos(&self) -> GridPos {
        GridPos::new(self.row, self.col)
    }
}

/// A requested location that was left out of the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLocation {
    pub location: String,
    pub reason: String,
}

/// A planned pick route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Entry, each visited location's aisle cell, exit.
    pub optimized_route: Vec<Waypoint>,
    /// Every walked cell from entry to exit.
    pub full_path: Vec<GridPos>,
    pub total_distance: usize,
    #[serde(default)]
    pub nodes_expanded: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedLocation>,
}
