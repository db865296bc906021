use sqlx::PgPool;
use tracing::info;

use crate::database::DatabaseError;

/// Run PostgreSQL database migrations (idempotent)
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    info!("Running PostgreSQL migrations");

    let mut tx = pool.begin().await.map_err(DatabaseError::MigrationError)?;

    info!("Creating blood_pressure_readings table if not exists");
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blood_pressure_readings (
            id          BIGSERIAL   PRIMARY KEY,
            user_id     BIGINT      NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL,
            l_systolic  INTEGER,
            l_diastolic INTEGER,
            r_systolic  INTEGER,
            r_diastolic INTEGER
        )
        "#,
    )
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::MigrationError)?;

    info!("Creating index on (user_id, created_at)");
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_blood_pressure_readings_user_created
            ON blood_pressure_readings (user_id, created_at)
        "#,
    )
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::MigrationError)?;

    tx.commit().await.map_err(DatabaseError::MigrationError)?;

    info!("PostgreSQL migrations completed successfully");
    Ok(())
}
