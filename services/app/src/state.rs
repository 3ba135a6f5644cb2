//! services/app/src/state.rs
//!
//! Defines the application's shared state and its composition root.

use std::sync::Arc;

use async_openai::{config::OpenAIConfig, Client};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::adapters::{
    blob::FsBlobStore, quiz_llm::OpenAiQuizAdapter, remote::RemoteBackend,
    snapshot::SnapshotBackend, summary_llm::OpenAiSummaryAdapter,
};
use crate::config::Config;
use crate::error::AppError;
use study_sync_core::ports::{
    BlobStore, PersistenceBackend, QuizGenerationService, SummaryGenerationService,
};
use study_sync_core::store::NoteStore;

/// The shared application state, created once at startup and handed to the
/// UI layer. Screens read derived views from `store` and invoke the flows
/// defined in [`crate::flows`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<NoteStore>,
    /// `None` when no API credential is configured; the flows then surface
    /// [`AppError::AiDisabled`] instead of crashing.
    pub summarizer: Option<Arc<dyn SummaryGenerationService>>,
    pub quiz_generator: Option<Arc<dyn QuizGenerationService>>,
}

impl AppState {
    /// Builds the full application: selects the persistence mode, hydrates
    /// the store, and wires the AI adapters when a credential is present.
    pub async fn from_config(config: Config) -> Result<Self, AppError> {
        let backend: Arc<dyn PersistenceBackend> = match &config.database_url {
            Some(url) => {
                info!("Connecting to remote database...");
                let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
                let remote = RemoteBackend::new(pool);
                info!("Running database migrations...");
                remote.run_migrations().await?;
                Arc::new(remote)
            }
            None => {
                info!(path = %config.storage_path.display(), "Using local snapshot storage");
                let blobs: Arc<dyn BlobStore> =
                    Arc::new(FsBlobStore::new(config.storage_path.clone()));
                Arc::new(SnapshotBackend::new(blobs))
            }
        };

        let store = NoteStore::new(backend);
        store.hydrate().await;

        let (summarizer, quiz_generator) = match &config.openai_api_key {
            Some(key) => {
                let client =
                    Client::with_config(OpenAIConfig::new().with_api_key(key.clone()));
                let summarizer: Arc<dyn SummaryGenerationService> = Arc::new(
                    OpenAiSummaryAdapter::new(client.clone(), config.summary_model.clone()),
                );
                let quiz_generator: Arc<dyn QuizGenerationService> = Arc::new(
                    OpenAiQuizAdapter::new(client, config.quiz_model.clone()),
                );
                (Some(summarizer), Some(quiz_generator))
            }
            None => {
                info!("OPENAI_API_KEY not set; AI features disabled");
                (None, None)
            }
        };

        Ok(Self {
            config: Arc::new(config),
            store,
            summarizer,
            quiz_generator,
        })
    }

    /// Assembles a state over pre-built collaborators. Tests use this with
    /// an in-memory backend and stub AI services.
    pub fn assemble(
        config: Config,
        store: Arc<NoteStore>,
        summarizer: Option<Arc<dyn SummaryGenerationService>>,
        quiz_generator: Option<Arc<dyn QuizGenerationService>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            summarizer,
            quiz_generator,
        }
    }
}
