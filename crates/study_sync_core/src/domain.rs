//! crates/study_sync_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or storage adapter; the
//! serde attributes only pin the wire names the snapshot format and the
//! AI contract use (camelCase, ISO-8601 dates).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-authored study document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub date: DateTime<Utc>,
    /// AI-generated bullet points. Absent until computed; when present,
    /// always a non-empty list, written whole or not at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<String>>,
}

/// The payload for creating a [`Note`]. `id` and `date` may be supplied by
/// callers that already hold them (remote-assigned records); the store
/// assigns both otherwise.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            id: None,
            date: None,
        }
    }
}

/// A partial update merged into an existing [`Note`] by id. Fields left as
/// `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub summary: Option<Vec<String>>,
}

impl NotePatch {
    /// Convenience constructor for the one patch the AI flow issues.
    pub fn summary(points: Vec<String>) -> Self {
        Self {
            summary: Some(points),
            ..Self::default()
        }
    }
}

/// An immutable record of one completed quiz attempt.
///
/// Records are append-only: never mutated after creation, only removed by
/// the cascade when the referenced note is deleted. `note_id` is a weak
/// reference and may dangle briefly while a delete is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: Uuid,
    pub note_id: Uuid,
    /// Integer percentage in [0, 100].
    pub score: u8,
    pub date: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(note_id: Uuid, score: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            note_id,
            score,
            date: Utc::now(),
        }
    }
}

/// One multiple-choice question produced by the quiz generator. Transient:
/// questions are shown to the user and discarded, only the final score is
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    /// Exactly four options; validated at parse time.
    pub options: Vec<String>,
    /// Index into `options`, in [0, 4).
    pub correct_index: usize,
    pub explanation: String,
}

/// The full persisted state: both collections, newest-first.
///
/// The serialized form (`notes` / `quizHistory`) is the snapshot wire
/// format written under the `"study-sync-storage"` key in local mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub notes: Vec<Note>,
    #[serde(rename = "quizHistory")]
    pub quiz_history: Vec<QuizResult>,
}
