//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, falling back to
//! defaults where a variable is unset.
//!
//! ## Environment Variables
//!
//! - `APP_ENV`: `development`, `production` or `test` (default: "development")
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 8080)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `LOG_FORMAT`: `text` or `json` (default: "text")
//! - `LOG_SOURCE`: Include file and line in log lines (default: true)
//! - `STORAGE_TYPE`: `memory` or `postgres` (default: "memory")
//! - `DATABASE_URL`: PostgreSQL connection string, required for postgres storage
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)

use std::env;

use appointments_db::StorageType;
use eyre::{Result, WrapErr, eyre};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Configuration for the appointments API server
///
/// # Example
///
/// ```no_run
/// use appointments_api::config::ApiConfig;
///
/// fn example() -> eyre::Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub environment: Environment,

    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    pub port: u16,

    pub log_level: Level,

    pub log_format: LogFormat,

    /// Whether log lines carry the source file and line number
    pub log_source: bool,

    pub storage_type: StorageType,

    /// PostgreSQL connection string, only read by the postgres backend
    pub database_url: Option<String>,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from the process environment
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT value cannot be parsed as a u16
    /// - STORAGE_TYPE names an unknown backend
    /// - STORAGE_TYPE is postgres and DATABASE_URL is not set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment = Environment::parse(&var("APP_ENV", "development"));

        // Network settings
        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "8080")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Logging settings
        let log_level = match var("LOG_LEVEL", "info").to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        let log_format = match var("LOG_FORMAT", "text").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let log_source = !matches!(
            var("LOG_SOURCE", "true").to_lowercase().as_str(),
            "false" | "0" | "no"
        );

        // Storage settings
        let storage_type: StorageType = var("STORAGE_TYPE", "memory")
            .parse()
            .wrap_err("Invalid STORAGE_TYPE value")?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage_type == StorageType::Postgres && database_url.is_none() {
            return Err(eyre!(
                "DATABASE_URL environment variable must be set for postgres storage"
            ));
        }

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS", "30")
            .parse()
            .unwrap_or(30);

        Ok(Self {
            environment,
            host,
            port,
            log_level,
            log_format,
            log_source,
            storage_type,
            database_url,
            cors_origins,
            request_timeout,
        })
    }

    /// Returns the server address, e.g. "127.0.0.1:8080"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
