//! Server configuration from environment.

use anyhow::{Context, Result};
use std::env;
use wms_core::{PlannerConfig, VisitOrder, WarehouseLayout};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// JSON layout file; the reference warehouse when unset.
    pub layout_path: Option<String>,
    pub visit_order: VisitOrder,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("WMS_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            layout_path: env::var("WMS_LAYOUT_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty()),
            visit_order: env::var("WMS_VISIT_ORDER")
                .ok()
                .and_then(|s| match s.parse() {
                    Ok(order) => Some(order),
                    Err(err) => {
                        tracing::warn!("Ignoring WMS_VISIT_ORDER: {}", err);
                        None
                    }
                })
                .unwrap_or_default(),
        }
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            visit_order: self.visit_order,
        }
    }

    /// Load and validate the configured layout.
    pub fn load_layout(&self) -> Result<WarehouseLayout> {
        let Some(path) = &self.layout_path else {
            return Ok(WarehouseLayout::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read layout file {}", path))?;
        WarehouseLayout::from_json(&json).with_context(|| format!("invalid layout in {}", path))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            layout_path: None,
            visit_order: VisitOrder::default(),
        }
    }
}
