pub mod ai;
pub mod domain;
pub mod ports;
pub mod store;

pub use ai::{parse_quiz, parse_summary, strip_code_fences, ParseError};
pub use domain::{Note, NoteDraft, NotePatch, QuizQuestion, QuizResult, Snapshot};
pub use ports::{
    BlobStore, PersistenceBackend, PortError, PortResult, QuizGenerationService, StoreChange,
    SummaryGenerationService,
};
pub use store::{NoteStore, StoreError};
