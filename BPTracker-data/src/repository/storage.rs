use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::models::blood_pressure::{NewReading, RawReading};
use super::errors::RepositoryError;

/// Database storage operations for blood pressure readings
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Store a reading in the database, writing only the columns of its arm
    pub async fn store_reading(pool: &PgPool, reading: &NewReading) -> Result<RawReading, RepositoryError> {
        debug!(
            "Storing blood pressure reading in database: user_id={} arm={}",
            reading.user_id, reading.arm
        );

        let prefix = reading.arm.column_prefix();
        let sql = format!(
            "INSERT INTO blood_pressure_readings
                (user_id, created_at, {prefix}_systolic, {prefix}_diastolic)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, created_at, l_systolic, l_diastolic, r_systolic, r_diastolic"
        );

        let stored = sqlx::query_as::<_, RawReading>(&sql)
            .bind(reading.user_id)
            .bind(reading.created_at)
            .bind(reading.systolic)
            .bind(reading.diastolic)
            .fetch_one(pool)
            .await?;

        Ok(stored)
    }

    /// Get a user's complete readings with `start <= created_at <= end`, oldest first
    pub async fn get_in_window(
        pool: &PgPool,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawReading>, RepositoryError> {
        debug!("Getting readings for user {} between {} and {}", user_id, start, end);

        let readings = sqlx::query_as::<_, RawReading>(
            r#"
            SELECT id, user_id, created_at, l_systolic, l_diastolic, r_systolic, r_diastolic
            FROM blood_pressure_readings
            WHERE user_id = $1
              AND created_at >= $2
              AND created_at <= $3
              AND (
                (l_systolic IS NOT NULL AND l_diastolic IS NOT NULL) OR
                (r_systolic IS NOT NULL AND r_diastolic IS NOT NULL)
              )
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(readings)
    }

    /// Get every complete reading of a user, oldest first
    pub async fn get_all_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<RawReading>, RepositoryError> {
        debug!("Getting all readings for user {}", user_id);

        let readings = sqlx::query_as::<_, RawReading>(
            r#"
            SELECT id, user_id, created_at, l_systolic, l_diastolic, r_systolic, r_diastolic
            FROM blood_pressure_readings
            WHERE user_id = $1
              AND (
                (l_systolic IS NOT NULL AND l_diastolic IS NOT NULL) OR
                (r_systolic IS NOT NULL AND r_diastolic IS NOT NULL)
              )
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(readings)
    }

    /// Round-trip a trivial query to check the pool
    pub async fn ping(pool: &PgPool) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
