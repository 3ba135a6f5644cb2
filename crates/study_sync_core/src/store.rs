//! crates/study_sync_core/src/store.rs
//!
//! The Note/Quiz Store: single source of truth for the in-memory notes and
//! quiz-history collections. All mutation passes through the operations
//! defined here; persistence is a write-behind effect that mirrors each
//! applied mutation to the injected [`PersistenceBackend`].
//!
//! Discipline: the in-memory change always commits (and subscribers are
//! notified) before the persist job is enqueued, so no reader ever observes
//! a state the durable layer has accepted but memory has not. Persistence
//! failures are logged and never rolled back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Note, NoteDraft, NotePatch, QuizResult, Snapshot};
use crate::ports::{PersistenceBackend, StoreChange};

/// Validation failures rejected before any state change.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("note title must not be empty")]
    EmptyTitle,
    #[error("note content must not be empty")]
    EmptyContent,
    #[error("summary must contain at least one point")]
    EmptySummary,
    #[error("quiz score must be in 0..=100, got {0}")]
    ScoreOutOfRange(u8),
}

/// Jobs consumed by the persistence worker, in enqueue order.
enum PersistJob {
    Write {
        change: StoreChange,
        snapshot: Snapshot,
    },
    /// Acknowledged once every previously enqueued write has completed.
    Flush(oneshot::Sender<()>),
}

/// The store. Explicitly constructed and passed by reference to its
/// callers; construct isolated instances with an in-memory backend in tests.
pub struct NoteStore {
    state: RwLock<Snapshot>,
    backend: Arc<dyn PersistenceBackend>,
    persist_tx: mpsc::UnboundedSender<PersistJob>,
    revision: watch::Sender<u64>,
    hydrated: AtomicBool,
}

impl NoteStore {
    /// Creates an empty store and spawns its persistence worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(backend: Arc<dyn PersistenceBackend>) -> Arc<Self> {
        let (persist_tx, mut persist_rx) = mpsc::unbounded_channel::<PersistJob>();
        let (revision, _) = watch::channel(0u64);

        let worker_backend = Arc::clone(&backend);
        tokio::spawn(async move {
            while let Some(job) = persist_rx.recv().await {
                match job {
                    PersistJob::Write { change, snapshot } => {
                        if let Err(e) = worker_backend.persist(&change, &snapshot).await {
                            warn!(error = %e, "failed to persist store mutation");
                        }
                    }
                    PersistJob::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });

        Arc::new(Self {
            state: RwLock::new(Snapshot::default()),
            backend,
            persist_tx,
            revision,
            hydrated: AtomicBool::new(false),
        })
    }

    //=====================================================================================
    // Lifecycle
    //=====================================================================================

    /// Loads the persisted snapshot. Runs at most once per store lifetime;
    /// repeat calls are no-ops. A failed or unreadable load falls back to
    /// empty collections rather than failing startup.
    pub async fn hydrate(&self) {
        if self.hydrated.swap(true, Ordering::SeqCst) {
            return;
        }
        match self.backend.hydrate().await {
            Ok(snapshot) => {
                let mut state = self.state.write().expect("store lock poisoned");
                *state = snapshot;
            }
            Err(e) => {
                warn!(error = %e, "could not hydrate persisted state, starting empty");
            }
        }
        self.bump_revision();
    }

    /// Waits until every persist job enqueued so far has been attempted.
    /// No caller-facing operation depends on this; it exists for host
    /// shutdown and for tests that assert on the durable copy.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.persist_tx.send(PersistJob::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// A receiver that observes a revision bump after every applied
    /// mutation (and after hydration). Subscribers re-read derived views.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    //=====================================================================================
    // Mutations
    //=====================================================================================

    /// Validates and prepends a new note (newest-first canonical order).
    /// Assigns `id` and `date` when the draft does not carry them.
    pub fn add_note(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if draft.content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let note = Note {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            title: draft.title,
            content: draft.content,
            category: draft.category,
            date: draft.date.unwrap_or_else(chrono::Utc::now),
            summary: None,
        };

        let snapshot = {
            let mut state = self.state.write().expect("store lock poisoned");
            state.notes.insert(0, note.clone());
            state.clone()
        };
        self.commit(StoreChange::NoteAdded(note.clone()), snapshot);
        Ok(note)
    }

    /// Merges `patch` into the note with the given id. An unknown id is a
    /// silent no-op: the one caller that can race a deletion (an in-flight
    /// AI summary committing after the note is gone) must not fail.
    pub fn update_note(&self, id: Uuid, patch: NotePatch) -> Result<(), StoreError> {
        if matches!(&patch.summary, Some(points) if points.is_empty()) {
            return Err(StoreError::EmptySummary);
        }

        let committed = {
            let mut state = self.state.write().expect("store lock poisoned");
            let merged = state.notes.iter_mut().find(|n| n.id == id).map(|note| {
                if let Some(title) = patch.title {
                    note.title = title;
                }
                if let Some(content) = patch.content {
                    note.content = content;
                }
                if let Some(category) = patch.category {
                    note.category = category;
                }
                if let Some(points) = patch.summary {
                    note.summary = Some(points);
                }
                note.clone()
            });
            merged.map(|note| (note, state.clone()))
        };

        if let Some((note, snapshot)) = committed {
            self.commit(StoreChange::NoteUpdated(note), snapshot);
        }
        Ok(())
    }

    /// Removes the note and every quiz result referencing it, in one
    /// write-lock section: readers never observe the note gone while stale
    /// history remains. Unknown ids are a no-op with no persistence traffic.
    pub fn delete_note(&self, id: Uuid) {
        let committed = {
            let mut state = self.state.write().expect("store lock poisoned");
            if !state.notes.iter().any(|n| n.id == id) {
                None
            } else {
                state.notes.retain(|n| n.id != id);
                state.quiz_history.retain(|r| r.note_id != id);
                Some(state.clone())
            }
        };

        if let Some(snapshot) = committed {
            self.commit(StoreChange::NoteDeleted { note_id: id }, snapshot);
        }
    }

    /// Appends an immutable quiz attempt record, newest-first.
    pub fn save_quiz_result(&self, result: QuizResult) -> Result<(), StoreError> {
        if result.score > 100 {
            return Err(StoreError::ScoreOutOfRange(result.score));
        }

        let snapshot = {
            let mut state = self.state.write().expect("store lock poisoned");
            state.quiz_history.insert(0, result.clone());
            state.clone()
        };
        self.commit(StoreChange::QuizResultSaved(result), snapshot);
        Ok(())
    }

    //=====================================================================================
    // Reads (pure; safe before hydrate, returning empty)
    //=====================================================================================

    pub fn notes(&self) -> Vec<Note> {
        self.state.read().expect("store lock poisoned").notes.clone()
    }

    pub fn note(&self, id: Uuid) -> Option<Note> {
        self.state
            .read()
            .expect("store lock poisoned")
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    pub fn quiz_history(&self) -> Vec<QuizResult> {
        self.state
            .read()
            .expect("store lock poisoned")
            .quiz_history
            .clone()
    }

    /// All quiz attempts for one note, newest-first.
    pub fn history_for_note(&self, note_id: Uuid) -> Vec<QuizResult> {
        self.state
            .read()
            .expect("store lock poisoned")
            .quiz_history
            .iter()
            .filter(|r| r.note_id == note_id)
            .cloned()
            .collect()
    }

    /// A deep copy of the full current state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.read().expect("store lock poisoned").clone()
    }

    //=====================================================================================
    // Internals
    //=====================================================================================

    /// Notifies subscribers and enqueues the write-behind job. Memory is
    /// already updated by the time this runs.
    fn commit(&self, change: StoreChange, snapshot: Snapshot) {
        self.bump_revision();
        let _ = self.persist_tx.send(PersistJob::Write { change, snapshot });
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

//=========================================================================================
// Tests
//=========================================================================================
