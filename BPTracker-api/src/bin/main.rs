use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use bp_tracker_api::api::{create_app, AppState};
use bp_tracker_api::config::AppConfig;
use bp_tracker_data::database::{connect_postgres, run_postgres_migrations, DatabaseConfig, DatabaseType};
use bp_tracker_data::repository::BloodPressureRepository;
use bp_tracker_domain::services::BloodPressureService;

/// The main entry point for the BPTracker API server
///
/// This function:
/// 1. Initializes environment variables from .env file
/// 2. Sets up tracing for logging
/// 3. Loads configuration and builds the reading repository
/// 4. Creates and starts the Axum web application
/// 5. Handles graceful shutdown
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    // Initialize tracing for structured logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("Starting BPTracker API server");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let repository = build_repository(&config.database).await?;
    info!("Using {} reading storage", repository.backend_name());

    let service = BloodPressureService::new(repository);
    let state = AppState::new(Arc::new(service), config.default_timezone.clone());
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    // Create a TCP listener and bind to the address
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Serve the application with graceful shutdown support
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Connect and migrate the configured storage
async fn build_repository(config: &DatabaseConfig) -> anyhow::Result<BloodPressureRepository> {
    match config.db_type {
        DatabaseType::PostgreSQL => {
            let pool = connect_postgres(config)
                .await
                .context("Failed to connect to PostgreSQL")?;
            run_postgres_migrations(&pool)
                .await
                .context("Failed to run PostgreSQL migrations")?;
            Ok(BloodPressureRepository::postgres(pool))
        }
        DatabaseType::InMemory => Ok(BloodPressureRepository::in_memory()),
    }
}

/// Waits for either CTRL+C or SIGTERM (on Unix systems)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
