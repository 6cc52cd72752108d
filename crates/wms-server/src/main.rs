//! Route server: plans warehouse pick routes for the UI over HTTP.

use anyhow::Result;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wms_server::api;
use wms_server::config::Config;
use wms_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wms_server=debug".parse()?)
                .add_directive("wms_core=info".parse()?),
        )
        .init();

    tracing::info!("Starting route server...");

    let config = Config::from_env();
    let state = Arc::new(AppState::from_config(&config)?);
    let layout = state.planner().layout();
    tracing::info!(
        "Layout {}x{}, entry {}, exit {}, visit order {:?}",
        layout.rows,
        layout.cols,
        layout.entry,
        layout.exit,
        config.visit_order
    );

    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
