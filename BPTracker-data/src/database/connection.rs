//! Database connection module for the BPTracker application
//!
//! Two storage backends are supported:
//! - PostgreSQL (via an explicitly owned `sqlx` pool)
//! - In-memory (process-local, used for development and tests)

use std::env;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;
use tracing::{error, info};

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// PostgreSQL database
    PostgreSQL,
    /// Process-local in-memory storage
    InMemory,
}

impl DatabaseType {
    /// Convert from string to database type
    pub fn parse(s: &str) -> Result<Self, DatabaseError> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DatabaseType::PostgreSQL),
            "memory" | "in_memory" | "inmemory" => Ok(DatabaseType::InMemory),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// Environment variable present but unparseable
    #[error("Invalid value for {0}: {1}")]
    InvalidEnvVar(String, String),

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Connection error
    #[error("Failed to connect to database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(#[source] sqlx::Error),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database type (postgres, memory)
    pub db_type: DatabaseType,
    /// Connection string for PostgreSQL
    pub connection_string: Option<String>,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::InMemory,
            connection_string: None,
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    ///
    /// - `DB_TYPE` – `postgres` or `memory` (default: `memory`)
    /// - `DB_CONNECTION` – PostgreSQL connection string, required for `postgres`
    /// - `DB_MAX_CONNECTIONS` – pool size (default: 10)
    /// - `DB_TIMEOUT_SECONDS` – acquire timeout (default: 30)
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let db_type = match env::var("DB_TYPE") {
            Ok(value) => DatabaseType::parse(&value)?,
            Err(_) => defaults.db_type,
        };

        let connection_string = env::var("DB_CONNECTION").ok();

        match db_type {
            DatabaseType::PostgreSQL => {
                if connection_string.is_none() {
                    return Err(DatabaseError::EnvVarNotFound("DB_CONNECTION".to_string()));
                }
                info!("Using PostgreSQL database with provided connection string");
            }
            DatabaseType::InMemory => {
                info!("Using in-memory storage; readings will not survive a restart");
            }
        }

        let max_connections = parse_env_or("DB_MAX_CONNECTIONS", defaults.max_connections)?;
        let timeout_seconds = parse_env_or("DB_TIMEOUT_SECONDS", defaults.timeout_seconds)?;

        info!(
            "Database configuration: max_connections={}, timeout={}s",
            max_connections, timeout_seconds
        );

        Ok(DatabaseConfig {
            db_type,
            connection_string,
            max_connections,
            timeout_seconds,
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, DatabaseError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| DatabaseError::InvalidEnvVar(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Open a PostgreSQL connection pool for the given configuration
pub async fn connect_postgres(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let connection_string = config
        .connection_string
        .as_ref()
        .ok_or_else(|| DatabaseError::EnvVarNotFound("DB_CONNECTION".to_string()))?;

    info!("Initializing PostgreSQL pool (max_connections={})", config.max_connections);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.timeout_seconds))
        .connect(connection_string)
        .await
        .map_err(|e| {
            error!("Failed to create PostgreSQL pool: {}", e);
            DatabaseError::ConnectionError(e)
        })
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.db_type, DatabaseType::InMemory);
        assert!(config.connection_string.is_none());
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_database_type_parse() {
        assert_eq!(DatabaseType::parse("postgres").unwrap(), DatabaseType::PostgreSQL);
        assert_eq!(DatabaseType::parse("PostgreSQL").unwrap(), DatabaseType::PostgreSQL);
        assert_eq!(DatabaseType::parse("memory").unwrap(), DatabaseType::InMemory);
        assert!(DatabaseType::parse("sqlite").is_err());
    }
}
