//! services/app/src/adapters/snapshot.rs
//!
//! Local-mode persistence: the whole store state as one JSON blob under a
//! namespaced key, read once at startup and rewritten wholesale on every
//! mutation.

use std::sync::Arc;

use async_trait::async_trait;
use study_sync_core::domain::Snapshot;
use study_sync_core::ports::{BlobStore, PersistenceBackend, PortError, PortResult, StoreChange};

/// The namespaced key the snapshot lives under in the blob store.
pub const STORAGE_KEY: &str = "study-sync-storage";

/// A `PersistenceBackend` that mirrors the store into a single JSON blob.
pub struct SnapshotBackend {
    blobs: Arc<dyn BlobStore>,
    key: String,
}

impl SnapshotBackend {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self::with_key(blobs, STORAGE_KEY)
    }

    pub fn with_key(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }
}

#[async_trait]
impl PersistenceBackend for SnapshotBackend {
    async fn hydrate(&self) -> PortResult<Snapshot> {
        match self.blobs.get(&self.key).await? {
            None => Ok(Snapshot::default()),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| PortError::Unexpected(format!("unreadable snapshot: {e}"))),
        }
    }

    async fn persist(&self, _change: &StoreChange, snapshot: &Snapshot) -> PortResult<()> {
        // The change tag is irrelevant here: local mode always rewrites the
        // full snapshot.
        let bytes = serde_json::to_vec(snapshot)
            .map_err(|e| PortError::Unexpected(format!("unserializable snapshot: {e}")))?;
        self.blobs.set(&self.key, bytes).await
    }
}
