//! Static warehouse layout: grid size, rack placement, entry and exit.

use crate::models::{GridPos, LocationCode, Zone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rows from a zone's base row to its back face.
pub const ZONE_BAND_ROWS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid layout json: {0}")]
    Json(String),
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("zone {zone} rows {base}..={last} fall outside a grid of {rows} rows")]
    ZoneOutOfBounds {
        zone: char,
        base: usize,
        last: usize,
        rows: usize,
    },
    #[error("zones {first} and {second} overlap")]
    ZonesOverlap { first: char, second: char },
    #[error("aisle column {col} is outside a grid of {cols} columns")]
    AisleOutOfBounds { col: usize, cols: usize },
    #[error("segment {segment} columns {start}..{end} fall outside a grid of {cols} columns")]
    SegmentOutOfBounds {
        segment: usize,
        start: usize,
        end: usize,
        cols: usize,
    },
    #[error("segment {segment} overlaps aisle column {col}")]
    SegmentOnAisle { segment: usize, col: usize },
    #[error("segments {first} and {second} overlap")]
    SegmentsOverlap { first: usize, second: usize },
    #[error("blocks_per_face must be positive")]
    NoBlocks,
    #[error("{point} {pos} is outside the grid")]
    PointOutOfBounds { point: &'static str, pos: GridPos },
    #[error("blocked cell {pos} is outside the grid")]
    BlockedOutOfBounds { pos: GridPos },
    #[error("blocked cell {pos} sits on aisle column {col}")]
    BlockedOnAisle { pos: GridPos, col: usize },
}

/// Every constant that shapes the grid.
///
/// Each zone occupies rows `base..base + 4`: front labels on `base`, rack core on
/// `base + 1` and `base + 2`, back labels on `base + 3`. A segment holds
/// `blocks_per_face` front blocks followed by the same number of back blocks, so
/// with the defaults `A0-A4` face forward and `A5-A9` face back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseLayout {
    pub rows: usize,
    pub cols: usize,
    pub zone_rows: [usize; Zone::COUNT],
    pub aisle_cols: Vec<usize>,
    pub segment_cols: Vec<usize>,
    pub blocks_per_face: usize,
    pub entry: GridPos,
    pub exit: GridPos,
    /// Extra obstacles such as pillars. Never on an aisle column.
    pub blocked_cells: Vec<GridPos>,
}

impl Default for WarehouseLayout {
    fn default() -> Self {
        Self {
            rows: 38,
            cols: 25,
            zone_rows: [7, 12, 17, 23, 28],
            aisle_cols: vec![0, 6, 12, 18, 24],
            segment_cols: vec![1, 7, 13, 19],
            blocks_per_face: 5,
            entry: GridPos::new(0, 12),
            exit: GridPos::new(35, 20),
            blocked_cells: Vec::new(),
        }
    }
}

impl WarehouseLayout {
    /// Parse a layout from JSON and validate it. Missing fields take the defaults.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: WarehouseLayout =
            serde_json::from_str(json).map_err(|err| LayoutError::Json(err.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn blocks_per_segment(&self) -> usize {
        self.blocks_per_face.saturating_mul(2)
    }

    /// Number of blocks each zone holds.
    pub fn blocks_per_zone(&self) -> usize {
        self.blocks_per_segment().saturating_mul(self.segment_cols.len())
    }

    pub fn is_aisle_col(&self, col: usize) -> bool {
        self.aisle_cols.contains(&col)
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(LayoutError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.blocks_per_face == 0 {
            return Err(LayoutError::NoBlocks);
        }

        for zone in Zone::ALL {
            let base = self.zone_rows[zone.index()];
            let last = base.checked_add(ZONE_BAND_ROWS - 1);
            if last.map_or(true, |last| last >= self.rows) {
                return Err(LayoutError::ZoneOutOfBounds {
                    zone: zone.letter(),
                    base,
                    last: last.unwrap_or(usize::MAX),
                    rows: self.rows,
                });
            }
        }
        for (i, first) in Zone::ALL.iter().enumerate() {
            for second in &Zone::ALL[i + 1..] {
                let a = self.zone_rows[first.index()];
                let b = self.zone_rows[second.index()];
                if a.abs_diff(b) < ZONE_BAND_ROWS {
                    return Err(LayoutError::ZonesOverlap {
                        first: first.letter(),
                        second: second.letter(),
                    });
                }
            }
        }

        if let Some(&col) = self.aisle_cols.iter().find(|&&col| col >= self.cols) {
            return Err(LayoutError::AisleOutOfBounds {
                col,
                cols: self.cols,
            });
        }

        let mut spans = Vec::with_capacity(self.segment_cols.len());
        for (segment, &start) in self.segment_cols.iter().enumerate() {
            let end = start.checked_add(self.blocks_per_face);
            match end {
                Some(end) if end <= self.cols => spans.push((start, end)),
                _ => {
                    return Err(LayoutError::SegmentOutOfBounds {
                        segment,
                        start,
                        end: end.unwrap_or(usize::MAX),
                        cols: self.cols,
                    })
                }
            }
        }
        for (segment, &(start, end)) in spans.iter().enumerate() {
            if let Some(&col) = self.aisle_cols.iter().find(|&&col| (start..end).contains(&col)) {
                return Err(LayoutError::SegmentOnAisle { segment, col });
            }
            for (other, &(other_start, other_end)) in spans.iter().enumerate().skip(segment + 1) {
                if start < other_end && other_start < end {
                    return Err(LayoutError::SegmentsOverlap {
                        first: segment,
                        second: other,
                    });
                }
            }
        }

        for (point, pos) in [("entry", self.entry), ("exit", self.exit)] {
            if !self.in_bounds(pos) {
                return Err(LayoutError::PointOutOfBounds { point, pos });
            }
        }

        for &pos in &self.blocked_cells {
            if !self.in_bounds(pos) {
                return Err(LayoutError::BlockedOutOfBounds { pos });
            }
            if self.is_aisle_col(pos.col) {
                return Err(LayoutError::BlockedOnAisle { pos, col: pos.col });
            }
        }

        Ok(())
    }

    /// Grid cell of a storage slot, or `None` when the block lies past the last segment.
    pub fn position_of(&self, code: LocationCode) -> Option<GridPos> {
        let block = usize::try_from(code.block).ok()?;
        let per_segment = self.blocks_per_segment();
        if per_segment == 0 {
            return None;
        }
        let base_col = *self.segment_cols.get(block / per_segment)?;
        let within = block % per_segment;
        let base_row = self.zone_rows[code.zone.index()];
        let row = if within < self.blocks_per_face {
            base_row
        } else {
            base_row.checked_add(ZONE_BAND_ROWS - 1)?
        };
        let col = base_col.checked_add(within % self.blocks_per_face)?;
        Some(GridPos::new(row, col))
    }

    /// Every storage slot the layout defines, zone by zone.
    pub fn all_locations(&self) -> impl Iterator<Item = LocationCode> + '_ {
        let blocks = self.blocks_per_zone() as u32;
        Zone::ALL
            .into_iter()
            .flat_map(move |zone| (0..blocks).map(move |block| LocationCode::new(zone, block)))
    }
}

/// Map a textual location code to its grid cell. Malformed codes map to nothing.
pub fn location_to_grid_position(layout: &WarehouseLayout, location: &str) -> Option<GridPos> {
    let code: LocationCode = location.parse().ok()?;
    layout.position_of(code)
}
