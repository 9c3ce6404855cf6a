//! Claims Review - API Server Binary
//!
//! This binary starts the HTTP API adjusters use to review claims.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claims-review-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_ASSISTANT_URL=http://assistant:8000 cargo run --bin claims-review-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` / `API_PORT` - Bind address (default: 0.0.0.0:8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string; otherwise built from
//!   `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_DB`
//! * `API_RUN_MIGRATIONS` - Apply embedded migrations at startup (default: false)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LOG_FORMAT` - `plain` or `json` (default: plain)
//! * `API_SCHEMA_PATH` / `API_MODEL_PATH` - Fraud artifacts
//! * `API_FRAUD_THRESHOLD` - Flagging threshold (default: 0.30)
//! * `API_SEARCH_LIMIT` - Default search result count (default: 10)
//! * `API_ASSISTANT_URL` - Document assistant endpoint; disabled when unset
//! * `API_ASSISTANT_API_KEY`, `API_ASSISTANT_TIMEOUT_SECS`, `API_ASSISTANT_MAX_ATTEMPTS`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_claims::ClaimRepository;
use infra_db::{create_pool, run_migrations, PostgresClaimAdapter};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::context::AppContext;
use interface_api::create_router;

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration and artifacts, establishes the
/// database pool, and starts the HTTP server. Artifact or database failures
/// abort startup.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Invalid API configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Claims Review API Server"
    );

    let pool = create_pool(config.database())
        .await
        .context("Failed to connect to the claims database")?;

    if config.run_migrations {
        run_migrations(&pool).await.context("Failed to apply migrations")?;
    }

    let repository: Arc<dyn ClaimRepository> = Arc::new(PostgresClaimAdapter::new(pool));
    let context = AppContext::initialize(&config, repository).map_err(|e| {
        tracing::error!(error = %e, "Failed to load fraud artifacts");
        e
    })?;

    let app = create_router(Arc::new(context), config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` overrides the configured level when set.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Plain => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
