//! In-warehouse pick route planning.
//!
//! Turns a list of rack location codes (`A3`, `C12`, ...) into one continuous
//! walk from the warehouse entry, past each location, to the packing station.

pub mod aisle;
pub mod astar;
pub mod error;
pub mod grid;
pub mod layout;
pub mod models;
pub mod planner;

pub use aisle::find_nearest_aisle;
pub use astar::{find_path, validate_path, PathResult};
pub use error::{PathError, PathViolation, RouteError, ViolationReason};
pub use grid::{build_grid, LocationMap, Neighborhood, WarehouseGrid};
pub use layout::{location_to_grid_position, LayoutError, WarehouseLayout};
pub use models::{
    Cell, GridPos, LocationCode, LocationParseError, Route, SkippedLocation, Waypoint, Zone,
};
pub use planner::{
    plan_route, PlannerConfig, RoutePlanner, VisitOrder, ENTRY_LABEL, EXIT_LABEL,
};
