//! Application configuration loaded from the environment
//!
//! - `PORT` – listen port (default: 3000)
//! - `DEFAULT_TIMEZONE` – IANA zone used when a request names none
//!   (default: `America/Los_Angeles`)
//! - database settings, see [`DatabaseConfig::from_env`]

use std::env;

use chrono_tz::Tz;
use thiserror::Error;
use tracing::info;

use bp_tracker_data::database::{DatabaseConfig, DatabaseError};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),

    #[error("Invalid DEFAULT_TIMEZONE: {0}")]
    InvalidTimezone(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub default_timezone: String,
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => parse_port(&value)?,
            Err(_) => DEFAULT_PORT,
        };

        let default_timezone = match env::var("DEFAULT_TIMEZONE") {
            Ok(value) => parse_default_timezone(&value)?,
            Err(_) => DEFAULT_TIMEZONE.to_string(),
        };

        let database = DatabaseConfig::from_env()?;

        info!("Configuration loaded: port={}, default_timezone={}", port, default_timezone);

        Ok(AppConfig {
            port,
            default_timezone,
            database,
        })
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(value.to_string()))
}

fn parse_default_timezone(value: &str) -> Result<String, ConfigError> {
    let name = value.trim();
    name.parse::<Tz>()
        .map(|_| name.to_string())
        .map_err(|_| ConfigError::InvalidTimezone(value.to_string()))
}
