//! services/app/src/adapters/blob.rs
//!
//! Durable blob store adapters: the concrete implementations of the
//! `BlobStore` port. `FsBlobStore` is the on-device implementation;
//! `MemoryBlobStore` is the injectable fake used by tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use study_sync_core::ports::{BlobStore, PortError, PortResult};

//=========================================================================================
// Filesystem-backed Blob Store
//=========================================================================================

/// Stores each blob as one file under a root directory, named after its key.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are namespaced identifiers, not paths; flatten any separators.
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, key: &str) -> PortResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> PortResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Write to a temp file and rename so a crash mid-write never leaves
        // a truncated snapshot behind.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

//=========================================================================================
// In-memory Blob Store (test fake)
//=========================================================================================

/// A `HashMap` behind a mutex. Construct one per test to get an isolated,
/// inspectable durable layer.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the stored bytes, for assertions on the wire format.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().expect("blob lock poisoned").get(key).cloned()
    }

    /// Pre-seeds a blob, for hydration tests.
    pub fn seed(&self, key: &str, value: Vec<u8>) {
        self.blobs
            .lock()
            .expect("blob lock poisoned")
            .insert(key.to_string(), value);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> PortResult<Option<Vec<u8>>> {
        Ok(self.blobs.lock().expect("blob lock poisoned").get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> PortResult<()> {
        self.blobs
            .lock()
            .expect("blob lock poisoned")
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.blobs.lock().expect("blob lock poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fs_store_round_trips_and_reports_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().to_path_buf());

        assert_eq!(store.get("absent").await.unwrap(), None);

        store.set("study-sync-storage", b"{}".to_vec()).await.unwrap();
        assert_eq!(
            store.get("study-sync-storage").await.unwrap(),
            Some(b"{}".to_vec())
        );

        store.remove("study-sync-storage").await.unwrap();
        assert_eq!(store.get("study-sync-storage").await.unwrap(), None);
        // Removing again stays idempotent.
        store.remove("study-sync-storage").await.unwrap();
    }

    #[tokio::test]
    async fn fs_store_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().to_path_buf());

        store.set("k", b"one".to_vec()).await.unwrap();
        store.set("k", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));
    }
}
