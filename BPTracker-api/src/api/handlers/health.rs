use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use bp_tracker_domain::health::{HealthComponent, SystemStatus};

use crate::api::AppState;

/// Health check response model
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current service status ("ok" or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// When the response was generated
    pub timestamp: DateTime<Utc>,
    /// Uptime of the service in seconds
    pub uptime: u64,
    /// Details about the components of the system
    pub components: HashMap<String, HealthComponent>,
}

/// Health check endpoint to verify the API and its storage are running
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check requested");

    let system_health = state.service.health().await;

    let (status_code, status) = match system_health.status {
        SystemStatus::Healthy => (StatusCode::OK, "ok"),
        SystemStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, "error"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs(),
        components: system_health.components,
    };

    (status_code, Json(response))
}
