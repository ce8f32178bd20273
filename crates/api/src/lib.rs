//! # Appointments API
//!
//! HTTP surface of the appointment booking service.
//!
//! ## Architecture
//!
//! - **Routes**: API endpoints and URL structure
//! - **Handlers**: request validation and response shaping
//! - **Middleware**: error mapping
//! - **Config**: environment driven settings
//!
//! Handlers only talk to an [`AppointmentService`]; storage is chosen at
//! start-up and injected through [`start_server`].

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use appointments_core::{
    booking::{AppointmentService, BookingService},
    repository::AppointmentRepository,
};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::config::{ApiConfig, LogFormat};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub service: Arc<dyn AppointmentService>,

    /// Cancelled once the server starts shutting down. Every request works
    /// with a child of this token.
    pub shutdown: CancellationToken,
}

/// Installs the global `tracing` subscriber described by `config`.
pub fn init_tracing(config: &ApiConfig) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_file(config.log_source)
        .with_line_number(config.log_source);

    match config.log_format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }

    Ok(())
}

/// Builds the application router with all routes and middleware
pub fn app(state: Arc<ApiState>, config: &ApiConfig) -> Result<Router> {
    let app = Router::new()
        .merge(routes::health::routes())
        .merge(routes::appointment::routes())
        .merge(routes::availability::routes())
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) if !origins.is_empty() => {
            let origins = origins
                .iter()
                .map(|origin| {
                    origin
                        .parse::<HeaderValue>()
                        .wrap_err_with(|| format!("Invalid CORS origin: {origin}"))
                })
                .collect::<Result<Vec<_>>>()?;

            let cors = CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(AllowOrigin::list(origins));

            app.layer(cors)
        }
        _ => app,
    };

    Ok(app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(TraceLayer::new_for_http()))
}

/// Starts the API server and blocks until it has shut down
///
/// On Ctrl-C or SIGTERM the shutdown token is cancelled, in-flight requests
/// are drained and `repository` is closed.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use appointments_api::{config::ApiConfig, start_server};
/// use appointments_db::create_repository;
///
/// let config = ApiConfig::from_env()?;
/// let repository =
///     create_repository(config.storage_type, config.database_url.as_deref()).await?;
/// start_server(config, repository).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(
    config: ApiConfig,
    repository: Arc<dyn AppointmentRepository>,
) -> Result<()> {
    let shutdown = CancellationToken::new();
    let service: Arc<dyn AppointmentService> = Arc::new(BookingService::new(repository.clone()));
    let state = Arc::new(ApiState {
        service,
        shutdown: shutdown.clone(),
    });

    let app = app(state, &config)?;

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;
    info!(
        "Starting {} v{} ({:?}) with {} storage on http://{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.environment,
        config.storage_type,
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    repository.close().await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
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

    info!("Shutdown signal received, cancelling in-flight work");
    shutdown.cancel();
}
