//! Pick route planning: entry, every requested rack location, exit.
//!
//! A planner holds only immutable layout and settings. Each call builds its own
//! grid and search state, so one planner can serve concurrent callers.

use crate::aisle::find_nearest_aisle;
use crate::astar::{find_path, validate_path, PathResult};
use crate::error::{PathError, PathViolation, RouteError, MAX_VIOLATION_SAMPLES};
use crate::grid::{build_grid, WarehouseGrid};
use crate::layout::WarehouseLayout;
use crate::models::{GridPos, LocationCode, Route, SkippedLocation, Waypoint};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENTRY_LABEL: &str = "entry";
pub const EXIT_LABEL: &str = "exit";

/// Order in which resolved locations are walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitOrder {
    /// Caller's order, e.g. order line sequence.
    #[default]
    AsGiven,
    /// Greedy: always walk to the closest remaining location next.
    NearestNeighbor,
}

impl FromStr for VisitOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "as_given" | "given" => Ok(VisitOrder::AsGiven),
            "nearest_neighbor" | "nearest" => Ok(VisitOrder::NearestNeighbor),
            other => Err(format!(
                "unknown visit order '{other}' (expected as_given or nearest_neighbor)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub visit_order: VisitOrder,
}

/// A requested location mapped onto the grid.
#[derive(Debug, Clone)]
struct Stop {
    label: String,
    cell: GridPos,
}

/// The walk from the current position to the aisle cell serving a stop.
struct Leg {
    aisle: GridPos,
    segment: PathResult,
}

#[derive(Debug, Clone)]
pub struct RoutePlanner {
    layout: WarehouseLayout,
    config: PlannerConfig,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self {
            layout: WarehouseLayout::default(),
            config: PlannerConfig::default(),
        }
    }
}

impl RoutePlanner {
    pub fn new(layout: WarehouseLayout) -> Result<Self, RouteError> {
        Self::with_config(layout, PlannerConfig::default())
    }

    pub fn with_config(layout: WarehouseLayout, config: PlannerConfig) -> Result<Self, RouteError> {
        layout.validate()?;
        Ok(Self { layout, config })
    }

    pub fn layout(&self) -> &WarehouseLayout {
        &self.layout
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a walk from the entry through each location's nearest aisle to the exit.
    ///
    /// Codes that do not parse or are not in the layout are skipped and reported in
    /// [`Route::skipped`]. A location that is mapped but cannot be walked to fails
    /// the whole route.
    pub fn plan<S: AsRef<str>>(&self, locations: &[S]) -> Result<Route, RouteError> {
        let (grid, location_map) = build_grid(&self.layout, locations);

        let entry = resolve_endpoint(&grid, ENTRY_LABEL, self.layout.entry)?;
        let exit = resolve_endpoint(&grid, EXIT_LABEL, self.layout.exit)?;

        let mut stops = Vec::with_capacity(locations.len());
        let mut skipped = Vec::new();
        for location in locations {
            let location = location.as_ref();
            let Some(&cell) = location_map.get(location) else {
                let reason = skip_reason(location);
                tracing::warn!(location, %reason, "skipping unresolvable location");
                skipped.push(SkippedLocation {
                    location: location.to_string(),
                    reason,
                });
                continue;
            };
            stops.push(Stop {
                label: location.to_string(),
                cell,
            });
        }

        let mut walk = Walk::new(entry);
        match self.config.visit_order {
            VisitOrder::AsGiven => {
                for stop in stops {
                    let leg = walk.leg_to(&grid, &stop)?;
                    walk.advance(stop, leg);
                }
            }
            VisitOrder::NearestNeighbor => {
                let mut remaining = stops;
                while !remaining.is_empty() {
                    let mut best: Option<(usize, Leg)> = None;
                    for (idx, stop) in remaining.iter().enumerate() {
                        let leg = walk.leg_to(&grid, stop)?;
                        if best.as_ref().map_or(true, |(_, shortest)| {
                            leg.segment.steps() < shortest.segment.steps()
                        }) {
                            best = Some((idx, leg));
                        }
                    }
                    if let Some((idx, leg)) = best {
                        let stop = remaining.remove(idx);
                        walk.advance(stop, leg);
                    }
                }
            }
        }

        let final_leg = find_path(&grid, walk.current, exit).map_err(|err| match err {
            PathError::InvalidPath { violations } => invariant_violation(violations),
            _ => RouteError::UnreachableExit {
                from: walk.current,
                to: exit,
            },
        })?;
        walk.nodes_expanded += final_leg.nodes_expanded;
        walk.append(final_leg.path);

        let violations = validate_path(&grid, &walk.full_path, true);
        if !violations.is_empty() {
            tracing::error!(
                total = violations.len(),
                path_len = walk.full_path.len(),
                "planned route walks through invalid cells"
            );
            for violation in violations.iter().take(5) {
                tracing::error!(%violation, "invalid route point");
            }
            return Err(invariant_violation(violations));
        }

        let mut optimized_route = Vec::with_capacity(walk.waypoints.len() + 2);
        optimized_route.push(Waypoint::new(ENTRY_LABEL, entry));
        optimized_route.append(&mut walk.waypoints);
        optimized_route.push(Waypoint::new(EXIT_LABEL, exit));

        tracing::debug!(
            stops = optimized_route.len() - 2,
            skipped = skipped.len(),
            total_distance = walk.full_path.len(),
            nodes_expanded = walk.nodes_expanded,
            "route planned"
        );

        Ok(Route {
            optimized_route,
            total_distance: walk.full_path.len(),
            full_path: walk.full_path,
            nodes_expanded: walk.nodes_expanded,
            skipped,
        })
    }

    /// The grid every plan walks on.
    pub fn grid(&self) -> WarehouseGrid {
        build_grid::<&str>(&self.layout, &[]).0
    }
}

/// Plan on the reference warehouse layout.
pub fn plan_route<S: AsRef<str>>(locations: &[S]) -> Result<Route, RouteError> {
    RoutePlanner::default().plan(locations)
}

/// Accumulated walk state for one planning call.
struct Walk {
    current: GridPos,
    full_path: Vec<GridPos>,
    waypoints: Vec<Waypoint>,
    nodes_expanded: usize,
}

impl Walk {
    fn new(entry: GridPos) -> Self {
        Self {
            current: entry,
            full_path: Vec::new(),
            waypoints: Vec::new(),
            nodes_expanded: 0,
        }
    }

    /// Resolve the stop's aisle cell and search a path to it from the current position.
    fn leg_to(&self, grid: &WarehouseGrid, stop: &Stop) -> Result<Leg, RouteError> {
        let Some(aisle) = find_nearest_aisle(grid, stop.cell) else {
            tracing::error!(location = %stop.label, cell = %stop.cell, "location is walled in");
            return Err(RouteError::LocationWalledIn {
                location: stop.label.clone(),
                cell: stop.cell,
            });
        };
        let segment = find_path(grid, self.current, aisle).map_err(|err| match err {
            PathError::InvalidPath { violations } => invariant_violation(violations),
            err => {
                tracing::error!(location = %stop.label, %err, "location unreachable");
                RouteError::UnreachableLocation {
                    location: stop.label.clone(),
                    from: self.current,
                    to: aisle,
                }
            }
        })?;
        Ok(Leg { aisle, segment })
    }

    fn advance(&mut self, stop: Stop, leg: Leg) {
        self.nodes_expanded += leg.segment.nodes_expanded;
        self.append(leg.segment.path);
        self.current = leg.aisle;
        self.waypoints.push(Waypoint::new(stop.label, leg.aisle));
    }

    /// Join a segment, dropping its first point when it repeats the junction.
    fn append(&mut self, segment: Vec<GridPos>) {
        let skip = usize::from(!self.full_path.is_empty());
        self.full_path.extend(segment.into_iter().skip(skip));
    }
}

fn resolve_endpoint(
    grid: &WarehouseGrid,
    point: &'static str,
    pos: GridPos,
) -> Result<GridPos, RouteError> {
    if grid.is_traversable(pos) {
        return Ok(pos);
    }
    tracing::warn!(point, %pos, "endpoint is blocked, moving to nearest aisle");
    match find_nearest_aisle(grid, pos) {
        Some(aisle) => {
            tracing::info!(point, from = %pos, to = %aisle, "endpoint relocated");
            Ok(aisle)
        }
        None => Err(RouteError::Configuration { point, pos }),
    }
}

fn skip_reason(location: &str) -> String {
    match location.parse::<LocationCode>() {
        Err(err) => err.to_string(),
        Ok(code) => format!("{code} is outside the warehouse layout"),
    }
}

fn invariant_violation(mut violations: Vec<PathViolation>) -> RouteError {
    let total = violations.len();
    violations.truncate(MAX_VIOLATION_SAMPLES);
    RouteError::InvariantViolation {
        total,
        samples: violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_reference_scenario() {
        let route = plan_route(&["A0", "B15"]).unwrap();
        let labels: Vec<_> = route
            .optimized_route
            .iter()
            .map(|wp| wp.location_label.as_str())
            .collect();
        assert_eq!(labels, ["entry", "A0", "B15", "exit"]);
        assert_eq!(route.optimized_route[1].pos(), GridPos::new(6, 1));
        assert_eq!(route.optimized_route[2].pos(), GridPos::new(16, 7));
        assert_eq!(route.full_path.first(), Some(&GridPos::new(0, 12)));
        assert_eq!(route.full_path.last(), Some(&GridPos::new(35, 20)));
        assert_eq!(route.total_distance, route.full_path.len());
        assert!(route.skipped.is_empty());
    }

    #[test]
    fn empty_request_walks_entry_to_exit() {
        let route = plan_route::<&str>(&[]).unwrap();
        assert_eq!(route.optimized_route.len(), 2);
        // Manhattan distance (35 + 8) plus the start cell, the band crossings never force a detour here.
        assert_eq!(route.total_distance, 44);
    }

    #[test]
    fn skips_malformed_codes() {
        let route = plan_route(&["A0", "Z99", "A40", "B15"]).unwrap();
        assert_eq!(route.optimized_route.len(), 4);
        let skipped: Vec<_> = route.skipped.iter().map(|s| s.location.as_str()).collect();
        assert_eq!(skipped, ["Z99", "A40"]);
        assert!(route.skipped[1].reason.contains("outside"));
    }

    #[test]
    fn repeated_location_adds_no_steps() {
        let once = plan_route(&["C12"]).unwrap();
        let twice = plan_route(&["C12", "C12"]).unwrap();
        assert_eq!(once.full_path, twice.full_path);
        assert_eq!(twice.optimized_route.len(), 4);
    }

    #[test]
    fn nearest_neighbor_never_walks_farther() {
        let codes = ["E39", "A0", "D20", "A4", "C12"];
        let given = plan_route(&codes).unwrap();
        let planner = RoutePlanner::with_config(
            WarehouseLayout::default(),
            PlannerConfig {
                visit_order: VisitOrder::NearestNeighbor,
            },
        )
        .unwrap();
        let greedy = planner.plan(&codes).unwrap();
        assert_eq!(greedy.optimized_route[1].location_label, "A4");
        assert!(greedy.total_distance <= given.total_distance);
        assert_eq!(greedy.optimized_route.len(), given.optimized_route.len());
    }

    #[test]
    fn parses_visit_order() {
        assert_eq!("as_given".parse(), Ok(VisitOrder::AsGiven));
        assert_eq!("Nearest-Neighbor".parse(), Ok(VisitOrder::NearestNeighbor));
        assert!("random".parse::<VisitOrder>().is_err());
    }

    #[test]
    fn blocked_entry_moves_to_aisle() {
        let layout = WarehouseLayout {
            entry: GridPos::new(8, 3),
            ..WarehouseLayout::default()
        };
        let route = RoutePlanner::new(layout).unwrap().plan(&["A2"]).unwrap();
        assert_eq!(route.optimized_route[0].pos(), GridPos::new(6, 3));
        assert_eq!(route.full_path[0], GridPos::new(6, 3));
    }

    #[test]
    fn walled_in_entry_is_configuration_error() {
        let layout = WarehouseLayout {
            entry: GridPos::new(8, 3),
            blocked_cells: vec![GridPos::new(7, 3)],
            ..WarehouseLayout::default()
        };
        let err = RoutePlanner::new(layout).unwrap().plan(&["A0"]).unwrap_err();
        assert_eq!(
            err,
            RouteError::Configuration {
                point: "entry",
                pos: GridPos::new(8, 3)
            }
        );
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn locations_fail_in_visiting_order() {
        // A2's aisle cell is a dead pocket; D22 has no aisle within reach at all.
        let layout = WarehouseLayout {
            blocked_cells: vec![
                GridPos::new(5, 3),
                GridPos::new(6, 2),
                GridPos::new(6, 4),
                GridPos::new(7, 2),
                GridPos::new(7, 4),
                GridPos::new(22, 15),
                GridPos::new(23, 14),
                GridPos::new(23, 16),
            ],
            ..WarehouseLayout::default()
        };
        let planner = RoutePlanner::new(layout).unwrap();

        assert_eq!(
            planner.plan(&["A0", "A2", "D22"]).unwrap_err(),
            RouteError::UnreachableLocation {
                location: "A2".to_string(),
                from: GridPos::new(6, 1),
                to: GridPos::new(6, 3),
            }
        );

        let err = planner.plan(&["D22", "A2"]).unwrap_err();
        assert_eq!(
            err,
            RouteError::LocationWalledIn {
                location: "D22".to_string(),
                cell: GridPos::new(23, 15),
            }
        );
        assert_eq!(err.kind(), "unreachable_location");
        assert!(err.to_string().contains("no aisle can be reached"));
    }

    #[test]
    fn invalid_layout_is_rejected_up_front() {
        let layout = WarehouseLayout {
            rows: 10,
            ..WarehouseLayout::default()
        };
        assert!(matches!(
            RoutePlanner::new(layout),
            Err(RouteError::Layout(_))
        ));
    }
}
