use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::models::blood_pressure::{NewReading, RawReading};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for blood pressure readings
///
/// Both fetch operations return only rows with at least one complete arm pair,
/// ordered by `created_at` ascending.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ReadingRepositoryTrait: Send + Sync {
    /// Store a new single-arm reading
    async fn insert_reading(&self, reading: NewReading) -> Result<RawReading, RepositoryError>;

    /// Get a user's readings created within `[start, end]` (both inclusive)
    async fn fetch_readings_in_window(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawReading>, RepositoryError>;

    /// Get all of a user's readings
    async fn fetch_all_readings(&self, user_id: i64) -> Result<Vec<RawReading>, RepositoryError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Storage backend owned by a repository
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// PostgreSQL connection pool
    Postgres(PgPool),
    /// Process-local storage
    InMemory(InMemoryStorage),
}

/// Repository for blood pressure readings.
#[derive(Debug, Clone)]
pub struct BloodPressureRepository {
    backend: StorageBackend,
}

impl BloodPressureRepository {
    /// Create a repository backed by a PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            backend: StorageBackend::Postgres(pool),
        }
    }

    /// Create a repository backed by fresh in-memory storage
    pub fn in_memory() -> Self {
        Self::with_storage(InMemoryStorage::new())
    }

    /// Create a repository over existing in-memory storage
    pub fn with_storage(storage: InMemoryStorage) -> Self {
        Self {
            backend: StorageBackend::InMemory(storage),
        }
    }

    /// Name of the active backend, for logs and health reports
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            StorageBackend::Postgres(_) => "postgres",
            StorageBackend::InMemory(_) => "memory",
        }
    }
}

#[async_trait]
impl ReadingRepositoryTrait for BloodPressureRepository {
    async fn insert_reading(&self, reading: NewReading) -> Result<RawReading, RepositoryError> {
        match &self.backend {
            StorageBackend::Postgres(pool) => DatabaseStorage::store_reading(pool, &reading).await,
            StorageBackend::InMemory(storage) => storage.store_reading(&reading).await,
        }
    }

    async fn fetch_readings_in_window(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawReading>, RepositoryError> {
        let readings = match &self.backend {
            StorageBackend::Postgres(pool) => DatabaseStorage::get_in_window(pool, user_id, start, end).await?,
            StorageBackend::InMemory(storage) => storage.get_in_window(user_id, start, end).await?,
        };
        debug!("Fetched {} readings in window for user {}", readings.len(), user_id);
        Ok(readings)
    }

    async fn fetch_all_readings(&self, user_id: i64) -> Result<Vec<RawReading>, RepositoryError> {
        let readings = match &self.backend {
            StorageBackend::Postgres(pool) => DatabaseStorage::get_all_for_user(pool, user_id).await?,
            StorageBackend::InMemory(storage) => storage.get_all_for_user(user_id).await?,
        };
        debug!("Fetched {} readings in total for user {}", readings.len(), user_id);
        Ok(readings)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        match &self.backend {
            StorageBackend::Postgres(pool) => DatabaseStorage::ping(pool).await,
            StorageBackend::InMemory(_) => Ok(()),
        }
    }
}
