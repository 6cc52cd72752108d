//! API routes for the route server.

mod routes;

pub use routes::{RouteRequest, StatusBody};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}
