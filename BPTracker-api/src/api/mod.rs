pub mod handlers;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use bp_tracker_domain::services::BloodPressureServiceTrait;

pub use routes::create_app;

/// Service type for dependency injection
pub type BloodPressureService = Arc<dyn BloodPressureServiceTrait>;

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub service: BloodPressureService,
    /// Zone used when a request does not name one
    pub default_timezone: String,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: BloodPressureService, default_timezone: impl Into<String>) -> Self {
        Self {
            service,
            default_timezone: default_timezone.into(),
            started_at: Instant::now(),
        }
    }

    /// Requested zone, or the configured default
    pub fn timezone<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_timezone)
    }
}
