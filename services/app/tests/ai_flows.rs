//! Tests for the summary and quiz flows, with stubbed AI services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use app_lib::adapters::blob::MemoryBlobStore;
use app_lib::adapters::snapshot::SnapshotBackend;
use app_lib::{AppError, AppState, Config};
use study_sync_core::domain::{NoteDraft, QuizQuestion};
use study_sync_core::ports::{
    BlobStore, PersistenceBackend, PortError, PortResult, QuizGenerationService,
    SummaryGenerationService,
};
use study_sync_core::store::NoteStore;

/// Counts invocations so tests can assert the summary cache short-circuits.
struct StubSummarizer {
    calls: AtomicUsize,
    fail: bool,
}

impl StubSummarizer {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail,
        })
    }
}

#[async_trait]
impl SummaryGenerationService for StubSummarizer {
    async fn summarize(&self, _content: &str) -> PortResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(PortError::Unexpected("model unavailable".into()))
        } else {
            Ok(vec!["key point".to_string(), "another point".to_string()])
        }
    }
}

struct StubQuizGenerator;

#[async_trait]
impl QuizGenerationService for StubQuizGenerator {
    async fn generate_quiz(&self, _content: &str) -> PortResult<Vec<QuizQuestion>> {
        Ok(vec![QuizQuestion {
            question: "What is being tested?".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 2,
            explanation: "The flow, not the model.".into(),
        }])
    }
}

async fn app_with(
    summarizer: Option<Arc<dyn SummaryGenerationService>>,
    quiz_generator: Option<Arc<dyn QuizGenerationService>>,
) -> AppState {
    let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
    let backend: Arc<dyn PersistenceBackend> = Arc::new(SnapshotBackend::new(blobs));
    let store = NoteStore::new(backend);
    store.hydrate().await;
    AppState::assemble(Config::default(), store, summarizer, quiz_generator)
}

#[tokio::test]
async fn summary_is_generated_once_and_cached_on_the_note() {
    let summarizer = StubSummarizer::new(false);
    let app = app_with(
        Some(summarizer.clone() as Arc<dyn SummaryGenerationService>),
        None,
    )
    .await;
    let note = app
        .store
        .add_note(NoteDraft::new("Cells", "Mitochondria are the powerhouse", "Science"))
        .unwrap();

    let first = app.summarize_note(note.id).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(
        app.store.note(note.id).unwrap().summary,
        Some(first.clone())
    );

    let second = app.summarize_note(note.id).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn summary_failure_commits_nothing() {
    let app = app_with(
        Some(StubSummarizer::new(true) as Arc<dyn SummaryGenerationService>),
        None,
    )
    .await;
    let note = app
        .store
        .add_note(NoteDraft::new("Fragile", "content", "General"))
        .unwrap();

    let err = app.summarize_note(note.id).await.unwrap_err();
    assert!(matches!(err, AppError::Port(_)));
    assert_eq!(app.store.note(note.id).unwrap().summary, None);
}

#[tokio::test]
async fn missing_credential_surfaces_as_ai_disabled() {
    let app = app_with(None, None).await;
    let note = app
        .store
        .add_note(NoteDraft::new("No key", "content", "General"))
        .unwrap();

    assert!(matches!(
        app.summarize_note(note.id).await.unwrap_err(),
        AppError::AiDisabled
    ));
    assert!(matches!(
        app.quiz_for_note(note.id).await.unwrap_err(),
        AppError::AiDisabled
    ));
}

#[tokio::test]
async fn unknown_note_is_reported_to_the_caller() {
    let app = app_with(
        Some(StubSummarizer::new(false) as Arc<dyn SummaryGenerationService>),
        None,
    )
    .await;
    let missing = uuid::Uuid::new_v4();

    assert!(matches!(
        app.summarize_note(missing).await.unwrap_err(),
        AppError::NoteNotFound(id) if id == missing
    ));
}

#[tokio::test]
async fn quiz_flow_returns_transient_questions() {
    let app = app_with(
        None,
        Some(Arc::new(StubQuizGenerator) as Arc<dyn QuizGenerationService>),
    )
    .await;
    let note = app
        .store
        .add_note(NoteDraft::new("Quizzable", "content", "General"))
        .unwrap();

    let questions = app.quiz_for_note(note.id).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_index, 2);
    // Nothing persisted until a score is recorded.
    assert!(app.store.quiz_history().is_empty());
}

#[tokio::test]
async fn quiz_scores_are_recorded_as_rounded_percentages() {
    let app = app_with(None, None).await;
    let note = app
        .store
        .add_note(NoteDraft::new("Scored", "content", "General"))
        .unwrap();

    let result = app.record_quiz_score(note.id, 2, 3).unwrap();
    assert_eq!(result.score, 67);

    let perfect = app.record_quiz_score(note.id, 5, 5).unwrap();
    assert_eq!(perfect.score, 100);

    let history = app.store.history_for_note(note.id);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, perfect.id); // newest first
}

#[tokio::test]
async fn impossible_quiz_outcomes_are_rejected() {
    let app = app_with(None, None).await;
    let note = app
        .store
        .add_note(NoteDraft::new("Strict", "content", "General"))
        .unwrap();

    assert!(app.record_quiz_score(note.id, 0, 0).is_err());
    assert!(app.record_quiz_score(note.id, 6, 5).is_err());
    assert!(app.store.quiz_history().is_empty());
}
