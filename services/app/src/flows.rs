//! services/app/src/flows.rs
//!
//! The non-rendering logic of the study screens: summary generation with
//! caching, quiz generation, and score recording. Screens call these and
//! surface any error to the user; a failed flow commits nothing.

use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use study_sync_core::domain::{NotePatch, QuizQuestion, QuizResult};

impl AppState {
    /// Returns the note's summary points, generating and committing them on
    /// first request. The committed summary is returned as-is on repeat
    /// requests so the external service is never billed twice for one note.
    pub async fn summarize_note(&self, note_id: Uuid) -> Result<Vec<String>, AppError> {
        let note = self
            .store
            .note(note_id)
            .ok_or(AppError::NoteNotFound(note_id))?;

        if let Some(points) = note.summary {
            debug!(%note_id, "serving cached summary");
            return Ok(points);
        }

        let summarizer = self.summarizer.as_ref().ok_or(AppError::AiDisabled)?;
        let points = summarizer.summarize(&note.content).await?;

        // Commit so repeat requests hit the cache. If the note was deleted
        // while the request was in flight this is a no-op by contract.
        self.store.update_note(note_id, NotePatch::summary(points.clone()))?;
        Ok(points)
    }

    /// Generates a fresh multiple-choice quiz from the note's content.
    /// Questions are transient; only the final score is ever persisted.
    pub async fn quiz_for_note(&self, note_id: Uuid) -> Result<Vec<QuizQuestion>, AppError> {
        let note = self
            .store
            .note(note_id)
            .ok_or(AppError::NoteNotFound(note_id))?;

        let generator = self.quiz_generator.as_ref().ok_or(AppError::AiDisabled)?;
        Ok(generator.generate_quiz(&note.content).await?)
    }

    /// Records a completed quiz attempt as an integer percentage,
    /// rounded half-up like the original score display.
    pub fn record_quiz_score(
        &self,
        note_id: Uuid,
        correct: u32,
        total: u32,
    ) -> Result<QuizResult, AppError> {
        if total == 0 || correct > total {
            return Err(AppError::Internal(format!(
                "invalid quiz outcome: {correct}/{total}"
            )));
        }

        let percentage = ((correct as f64 / total as f64) * 100.0).round() as u8;
        let result = QuizResult::new(note_id, percentage);
        self.store.save_quiz_result(result.clone())?;
        Ok(result)
    }
}
