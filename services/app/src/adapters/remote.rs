//! services/app/src/adapters/remote.rs
//!
//! Remote-mode persistence: a `PersistenceBackend` over a PostgreSQL
//! database using `sqlx`. Unlike the local snapshot backend, each store
//! mutation maps to the single matching statement, and the note/history
//! cascade is issued explicitly inside one transaction rather than relying
//! on a foreign-key constraint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use study_sync_core::domain::{Note, QuizResult, Snapshot};
use study_sync_core::ports::{PersistenceBackend, PortError, PortResult, StoreChange};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `PersistenceBackend` port.
#[derive(Clone)]
pub struct RemoteBackend {
    pool: PgPool,
}

impl RemoteBackend {
    /// Creates a new `RemoteBackend`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct NoteRecord {
    id: Uuid,
    title: String,
    content: String,
    category: String,
    date: DateTime<Utc>,
    /// The summary point list as a JSON array, nullable until computed.
    summary: Option<String>,
}

impl NoteRecord {
    fn to_domain(self) -> PortResult<Note> {
        let summary = self
            .summary
            .map(|raw| serde_json::from_str::<Vec<String>>(&raw))
            .transpose()
            .map_err(|e| PortError::Unexpected(format!("corrupt summary column: {e}")))?;
        Ok(Note {
            id: self.id,
            title: self.title,
            content: self.content,
            category: self.category,
            date: self.date,
            summary,
        })
    }
}

fn summary_column(note: &Note) -> PortResult<Option<String>> {
    note.summary
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| PortError::Unexpected(format!("unserializable summary: {e}")))
}

#[derive(FromRow)]
struct QuizResultRecord {
    id: Uuid,
    note_id: Uuid,
    score: i32,
    date: DateTime<Utc>,
}

impl QuizResultRecord {
    fn to_domain(self) -> QuizResult {
        QuizResult {
            id: self.id,
            note_id: self.note_id,
            score: self.score.clamp(0, 100) as u8,
            date: self.date,
        }
    }
}

//=========================================================================================
// `PersistenceBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl PersistenceBackend for RemoteBackend {
    async fn hydrate(&self) -> PortResult<Snapshot> {
        let note_records = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, title, content, category, date, summary FROM notes ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let history_records = sqlx::query_as::<_, QuizResultRecord>(
            "SELECT id, note_id, score, date FROM quiz_history ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let notes = note_records
            .into_iter()
            .map(NoteRecord::to_domain)
            .collect::<PortResult<Vec<_>>>()?;
        let quiz_history = history_records
            .into_iter()
            .map(QuizResultRecord::to_domain)
            .collect();

        Ok(Snapshot { notes, quiz_history })
    }

    async fn persist(&self, change: &StoreChange, _snapshot: &Snapshot) -> PortResult<()> {
        match change {
            StoreChange::NoteAdded(note) => {
                sqlx::query(
                    "INSERT INTO notes (id, title, content, category, date, summary) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(note.id)
                .bind(&note.title)
                .bind(&note.content)
                .bind(&note.category)
                .bind(note.date)
                .bind(summary_column(note)?)
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;
            }
            StoreChange::NoteUpdated(note) => {
                sqlx::query(
                    "UPDATE notes SET title = $2, content = $3, category = $4, summary = $5 \
                     WHERE id = $1",
                )
                .bind(note.id)
                .bind(&note.title)
                .bind(&note.content)
                .bind(&note.category)
                .bind(summary_column(note)?)
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;
            }
            StoreChange::NoteDeleted { note_id } => {
                // Explicit application-level cascade, history first, in one
                // transaction.
                let mut tx = self.pool.begin().await.map_err(unexpected)?;
                sqlx::query("DELETE FROM quiz_history WHERE note_id = $1")
                    .bind(note_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(unexpected)?;
                sqlx::query("DELETE FROM notes WHERE id = $1")
                    .bind(note_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(unexpected)?;
                tx.commit().await.map_err(unexpected)?;
            }
            StoreChange::QuizResultSaved(result) => {
                sqlx::query(
                    "INSERT INTO quiz_history (id, note_id, score, date) VALUES ($1, $2, $3, $4)",
                )
                .bind(result.id)
                .bind(result.note_id)
                .bind(result.score as i32)
                .bind(result.date)
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;
            }
        }
        Ok(())
    }
}
