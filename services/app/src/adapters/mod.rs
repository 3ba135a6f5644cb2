pub mod blob;
pub mod quiz_llm;
pub mod remote;
pub mod snapshot;
pub mod summary_llm;
