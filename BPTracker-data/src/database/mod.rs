// Database modules
pub mod connection;
pub mod migrations;

// Re-export database connection types and functions
pub use connection::{connect_postgres, DatabaseConfig, DatabaseError, DatabaseType};
pub use migrations::run_postgres_migrations;
