// Database migrations module

mod postgres;
pub use postgres::run_migrations as run_postgres_migrations;
