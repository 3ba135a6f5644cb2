//! crates/study_sync_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like durable
//! storage, a remote database, or the AI provider.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Note, QuizQuestion, QuizResult, Snapshot};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Durable Blob Store
//=========================================================================================

/// The opaque durable key-value collaborator backing local-mode persistence.
///
/// Implementations must tolerate absent keys (`get` returns `None`) and may
/// be freely substituted with an in-memory fake in tests.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: Vec<u8>) -> PortResult<()>;
    async fn remove(&self, key: &str) -> PortResult<()>;
}

//=========================================================================================
// Persistence Backend
//=========================================================================================

/// A tagged record of one applied store mutation, handed to the persistence
/// backend together with the post-mutation snapshot. Snapshot backends may
/// ignore the tag and rewrite wholesale; record-oriented backends issue the
/// single matching statement instead.
#[derive(Debug, Clone)]
pub enum StoreChange {
    NoteAdded(Note),
    /// Carries the fully merged note, not the patch.
    NoteUpdated(Note),
    NoteDeleted { note_id: Uuid },
    QuizResultSaved(QuizResult),
}

/// The store's persistence boundary.
///
/// Contract: `persist` is invoked *after* the in-memory change has been
/// applied, at least once per mutation, from a single worker in mutation
/// order. A returned error means the durable copy is stale; the store never
/// rolls back memory in response.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Loads the persisted snapshot at startup.
    async fn hydrate(&self) -> PortResult<Snapshot>;

    /// Mirrors one applied mutation to durable storage.
    async fn persist(&self, change: &StoreChange, snapshot: &Snapshot) -> PortResult<()>;
}

//=========================================================================================
// AI Generation Services
//=========================================================================================

#[async_trait]
pub trait SummaryGenerationService: Send + Sync {
    /// Distills note content into a short, non-empty list of bullet points.
    async fn summarize(&self, content: &str) -> PortResult<Vec<String>>;
}

#[async_trait]
pub trait QuizGenerationService: Send + Sync {
    /// Generates multiple-choice questions from note content.
    async fn generate_quiz(&self, content: &str) -> PortResult<Vec<QuizQuestion>>;
}
