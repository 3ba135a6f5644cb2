//! services/app/src/lib.rs
//!
//! The StudySync application layer: persistence adapters, AI adapters, and
//! the composition root the UI host embeds. There is no binary target —
//! hosts call [`config::init_tracing`] and [`state::AppState::from_config`]
//! and drive everything through the returned state.

pub mod adapters;
pub mod config;
pub mod error;
pub mod flows;
pub mod state;

pub use config::{init_tracing, Config, ConfigError};
pub use error::AppError;
pub use state::AppState;
