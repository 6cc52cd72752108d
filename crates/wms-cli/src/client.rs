//! HTTP client for the route server.

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use wms_core::{Route, VisitOrder};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteRequest<'a> {
    locations: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    visit_order: Option<VisitOrder>,
}

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    kind: Option<String>,
}

/// Blocking client for `POST /v1/routes`.
pub struct RouteClient {
    client: Client,
    base_url: String,
}

impl RouteClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the route server (e.g., "http://localhost:3000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Ask the server to plan a route.
    pub fn plan(&self, locations: &[String], visit_order: Option<VisitOrder>) -> Result<Route> {
        let url = format!("{}/v1/routes", self.base_url.trim_end_matches('/'));
        tracing::debug!("POST {} ({} locations)", url, locations.len());

        let response = self
            .client
            .post(&url)
            .json(&RouteRequest {
                locations,
                visit_order,
            })
            .send()
            .with_context(|| format!("failed to reach route server at {}", self.base_url))?;

        let status = response.status();
        if status.is_success() {
            return response.json().context("failed to decode route");
        }

        let text = response.text().unwrap_or_default();
        Err(rejection(status, &text))
    }
}

/// Turn a non-success response into an error, preferring the server's JSON error body.
fn rejection(status: StatusCode, text: &str) -> anyhow::Error {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => anyhow!(
            "route server rejected request ({}, {}): {}",
            status,
            body.kind.as_deref().unwrap_or("unknown"),
            body.error
        ),
        Err(_) => anyhow!("route server returned {}: {}", status, text),
    }
}
