use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::handlers::{blood_pressure, health};
use crate::api::AppState;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Routes scoped to a single user
    let user_routes = Router::new()
        .route("/:user_id/readings", post(blood_pressure::create_reading))
        // Define specific routes before parametrized routes to avoid conflicts
        .route("/:user_id/averages/range", get(blood_pressure::get_averages_range))
        .route("/:user_id/averages", get(blood_pressure::get_averages))
        .route("/:user_id/summary", get(blood_pressure::get_summary));

    debug!("User routes configured");

    let public_routes = Router::new().route("/health", get(health::health_check));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1/users", user_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
