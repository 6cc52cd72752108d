//! Route CLI - command line tools for warehouse pick routes.
//!
//! - plan_route: plan a pick route locally or through the route server

pub mod client;

use anyhow::{Context, Result};
use std::path::Path;
use wms_core::{Route, WarehouseGrid, WarehouseLayout};

pub use client::RouteClient;

/// Read a JSON layout file, or the reference layout when no path is given.
pub fn load_layout(path: Option<&Path>) -> Result<WarehouseLayout> {
    let Some(path) = path else {
        return Ok(WarehouseLayout::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    WarehouseLayout::from_json(&json)
        .with_context(|| format!("invalid layout in {}", path.display()))
}

/// Human-readable route summary, one stop per line.
pub fn format_summary(route: &Route) -> String {
    let mut out = String::new();
    for (idx, stop) in route.optimized_route.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<6} [{},{}]\n",
            idx, stop.location_label, stop.row, stop.col
        ));
    }
    out.push_str(&format!("total distance: {} cells\n", route.total_distance));
    for skipped in &route.skipped {
        out.push_str(&format!("skipped {}: {}\n", skipped.location, skipped.reason));
    }
    out
}

/// Grid drawing with the route overlaid.
pub fn format_grid(grid: &WarehouseGrid, route: &Route) -> String {
    grid.render_ascii(&route.full_path)
}
