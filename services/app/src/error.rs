//! services/app/src/error.rs
//!
//! Defines the primary error type for the application layer.

use crate::config::ConfigError;
use study_sync_core::ports::PortError;
use study_sync_core::store::StoreError;
use uuid::Uuid;

/// The primary error type for the `app` crate.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A validation failure rejected by the store before any state change.
    #[error("Store Error: {0}")]
    Store(#[from] StoreError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// AI features were requested but no API credential is configured.
    #[error("AI features are not configured: set OPENAI_API_KEY to enable them")]
    AiDisabled,

    /// The referenced note does not exist (surfaced to the user by the
    /// triggering screen; distinct from the store's silent no-op updates).
    #[error("Note {0} not found")]
    NoteNotFound(Uuid),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
