//! Shared application state.

use anyhow::Result;
use wms_core::RoutePlanner;

use crate::config::Config;

/// Immutable state shared by every request. Planning allocates per call, so no
/// locking is needed.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    planner: RoutePlanner,
}

impl AppState {
    pub fn new(planner: RoutePlanner) -> Self {
        Self { planner }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let layout = config.load_layout()?;
        let planner = RoutePlanner::with_config(layout, config.planner_config())?;
        Ok(Self::new(planner))
    }

    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }
}
