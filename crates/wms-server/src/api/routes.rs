//! REST API routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wms_core::{PlannerConfig, Route, RouteError, RoutePlanner, VisitOrder, WarehouseLayout};

use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/layout", get(get_layout))
        .route("/v1/grid", get(get_grid))
        .route("/v1/routes", post(plan_route_handler))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    /// Rack location codes in picking order, e.g. `["A3", "C12"]`.
    pub locations: Vec<String>,
    /// Overrides the server's configured visit order for this request.
    #[serde(default)]
    pub visit_order: Option<VisitOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBody {
    pub error: String,
    pub kind: String,
}

type ApiError = (StatusCode, Json<StatusBody>);

async fn get_layout(State(state): State<Arc<AppState>>) -> Json<WarehouseLayout> {
    Json(state.planner().layout().clone())
}

async fn get_grid(State(state): State<Arc<AppState>>) -> String {
    state.planner().grid().render_ascii(&[])
}

async fn plan_route_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<Route>, ApiError> {
    let configured = state.planner();
    let result = match request.visit_order {
        Some(order) if order != configured.config().visit_order => {
            let planner = RoutePlanner::with_config(
                configured.layout().clone(),
                PlannerConfig { visit_order: order },
            )
            .map_err(route_error)?;
            planner.plan(request.locations.as_slice())
        }
        _ => configured.plan(request.locations.as_slice()),
    };

    match result {
        Ok(route) => {
            tracing::debug!(
                "Planned route over {} location(s): {} cells, {} skipped",
                request.locations.len(),
                route.total_distance,
                route.skipped.len()
            );
            Ok(Json(route))
        }
        Err(err) => {
            tracing::warn!("Route planning failed: {}", err);
            Err(route_error(err))
        }
    }
}

fn route_error(err: RouteError) -> ApiError {
    let status = match err {
        RouteError::UnreachableLocation { .. }
        | RouteError::LocationWalledIn { .. }
        | RouteError::UnreachableExit { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RouteError::Layout(_)
        | RouteError::Configuration { .. }
        | RouteError::InvariantViolation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(StatusBody {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }),
    )
}
