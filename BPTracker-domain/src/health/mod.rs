//! Domain layer health check functionality
//! This module reports whether the reading store can be reached

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use bp_tracker_data::repository::ReadingRepositoryTrait;

/// System health status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone, Serialize)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone, Serialize)]
pub struct SystemHealth {
    pub status: SystemStatus,
    pub components: HashMap<String, HealthComponent>,
}

/// Check if the reading store is reachable
///
/// Returns `Err` with the storage error message when it is not.
pub async fn check_database_status<R>(repository: &R) -> Result<(), String>
where
    R: ReadingRepositoryTrait + ?Sized,
{
    repository
        .ping()
        .await
        .map_err(|e| format!("Database connection error: {}", e))
}

/// Get overall system health
pub async fn get_system_health<R>(repository: &R) -> SystemHealth
where
    R: ReadingRepositoryTrait + ?Sized,
{
    let db_component = match check_database_status(repository).await {
        Ok(()) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        Err(e) => {
            warn!("Health check failed: {}", e);
            HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            }
        }
    };

    let status = if db_component.status == ComponentStatus::Healthy {
        SystemStatus::Healthy
    } else {
        SystemStatus::Unhealthy
    };

    SystemHealth {
        status,
        components: vec![("database".to_string(), db_component)].into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_tracker_data::repository::{BloodPressureRepository, MockReadingRepositoryTrait, RepositoryError};

    #[tokio::test]
    async fn test_in_memory_store_is_healthy() {
        let repository = BloodPressureRepository::in_memory();
        let health = get_system_health(&repository).await;

        assert_eq!(health.status, SystemStatus::Healthy);
        assert_eq!(health.components["database"].status, ComponentStatus::Healthy);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_unhealthy() {
        let mut mock_repo = MockReadingRepositoryTrait::new();
        mock_repo
            .expect_ping()
            .returning(|| Err(RepositoryError::Lock("poisoned".to_string())));

        let health = get_system_health(&mock_repo).await;
        assert_eq!(health.status, SystemStatus::Unhealthy);

        let database = &health.components["database"];
        assert_eq!(database.status, ComponentStatus::Unhealthy);
        assert!(database.details.as_deref().unwrap_or_default().contains("poisoned"));

        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "unhealthy");
    }
}
