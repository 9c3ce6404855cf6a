//! API configuration
//!
//! Values come from `API_*` environment variables (after `.env` is loaded by
//! the binary). Anything unset keeps its default. When `API_DATABASE_URL` is
//! absent the URL is assembled from the `POSTGRES_*` variables used by the
//! ingestion process.

use serde::Deserialize;

use domain_fraud::DEFAULT_FRAUD_THRESHOLD;
use domain_claims::DEFAULT_SEARCH_LIMIT;
use infra_db::DatabaseConfig;

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL; assembled from `POSTGRES_*` when unset
    pub database_url: Option<String>,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
    /// Log level
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Path of the feature schema artifact
    pub schema_path: String,
    /// Path of the fraud model artifact
    pub model_path: String,
    /// Probability at or above which a claim is flagged
    pub fraud_threshold: f64,
    /// Default number of ids returned by a search
    pub search_limit: usize,
    /// Base URL of the document assistant; disabled when unset
    pub assistant_url: Option<String>,
    /// Bearer token for the document assistant
    pub assistant_api_key: Option<String>,
    /// Per-request assistant timeout in seconds
    pub assistant_timeout_secs: u64,
    /// Attempts per assistant question
    pub assistant_max_attempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: None,
            run_migrations: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Plain,
            schema_path: "artifacts/feature_schema.json".to_string(),
            model_path: "artifacts/fraud_model.json".to_string(),
            fraud_threshold: DEFAULT_FRAUD_THRESHOLD,
            search_limit: DEFAULT_SEARCH_LIMIT,
            assistant_url: None,
            assistant_api_key: None,
            assistant_timeout_secs: 30,
            assistant_max_attempts: 3,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves the database connection settings
    ///
    /// `API_DATABASE_URL` (or `DATABASE_URL`) wins; otherwise the URL is built
    /// from `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_HOST`,
    /// `POSTGRES_PORT` and `POSTGRES_DB`.
    pub fn database(&self) -> DatabaseConfig {
        if let Some(url) = self
            .database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
        {
            return DatabaseConfig::new(url);
        }

        let var = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.to_string());
        let port = std::env::var("POSTGRES_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432);

        DatabaseConfig::from_parts(
            &var("POSTGRES_USER", "postgres"),
            &var("POSTGRES_PASSWORD", "postgres"),
            &var("POSTGRES_HOST", "localhost"),
            port,
            &var("POSTGRES_DB", "claims"),
        )
    }

    /// Assistant URL with blank values treated as unset
    pub fn assistant_endpoint(&self) -> Option<&str> {
        self.assistant_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
