//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
///
/// Persistence mode is selected here: when `database_url` is present the
/// store runs against the remote backend, otherwise against the local
/// snapshot file under `storage_path`. One mode per process; there is no
/// migration between them.
#[derive(Clone, Debug)]
pub struct Config {
    pub storage_path: PathBuf,
    pub database_url: Option<String>,
    pub log_level: Level,
    /// Absent in stripped-down deployments; AI features are then disabled
    /// with a user-visible error instead of crashing.
    pub openai_api_key: Option<String>,
    pub summary_model: String,
    pub quiz_model: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let storage_path = std::env::var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let database_url = std::env::var("DATABASE_URL").ok();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        let summary_model =
            std::env::var("SUMMARY_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let quiz_model =
            std::env::var("QUIZ_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        Ok(Self {
            storage_path,
            database_url,
            log_level,
            openai_api_key,
            summary_model,
            quiz_model,
        })
    }
}

impl Default for Config {
    /// Local-mode defaults, matching `from_env` with an empty environment.
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./data"),
            database_url: None,
            log_level: Level::INFO,
            openai_api_key: None,
            summary_model: "gpt-4o-mini".to_string(),
            quiz_model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Installs the global tracing subscriber. Called once by the embedding
/// host before `AppState::from_config`.
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
