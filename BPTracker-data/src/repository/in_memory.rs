use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::models::blood_pressure::{Arm, NewReading, RawReading};
use super::errors::RepositoryError;

/// In-memory storage implementation for blood pressure readings
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    /// Storage for blood pressure readings, in insertion order
    readings: Arc<Mutex<Vec<RawReading>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reading in memory, assigning the next identifier
    pub async fn store_reading(&self, reading: &NewReading) -> Result<RawReading, RepositoryError> {
        let mut store = self.readings.lock()?;
        let id = store.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        let (l_systolic, l_diastolic, r_systolic, r_diastolic) = match reading.arm {
            Arm::Left => (Some(reading.systolic), Some(reading.diastolic), None, None),
            Arm::Right => (None, None, Some(reading.systolic), Some(reading.diastolic)),
        };

        let stored = RawReading {
            id,
            user_id: reading.user_id,
            created_at: reading.created_at,
            l_systolic,
            l_diastolic,
            r_systolic,
            r_diastolic,
        };
        store.push(stored.clone());
        Ok(stored)
    }

    /// Store an already shaped row as-is, used to seed fixtures
    pub async fn store_raw(&self, reading: RawReading) -> Result<(), RepositoryError> {
        let mut store = self.readings.lock()?;
        store.push(reading);
        Ok(())
    }

    /// Get a user's complete readings with `start <= created_at <= end`, oldest first
    pub async fn get_in_window(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawReading>, RepositoryError> {
        self.select(|r| r.user_id == user_id && r.created_at >= start && r.created_at <= end)
    }

    /// Get every complete reading of a user, oldest first
    pub async fn get_all_for_user(&self, user_id: i64) -> Result<Vec<RawReading>, RepositoryError> {
        self.select(|r| r.user_id == user_id)
    }

    fn select<F>(&self, predicate: F) -> Result<Vec<RawReading>, RepositoryError>
    where
        F: Fn(&RawReading) -> bool,
    {
        let store = self.readings.lock()?;
        let mut readings: Vec<RawReading> = store
            .iter()
            .filter(|r| r.is_complete() && predicate(r))
            .cloned()
            .collect();

        // Stable sort keeps insertion order for equal timestamps
        readings.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(readings)
    }
}
