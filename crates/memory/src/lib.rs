//! Conversation memory implementations for StudyMate.

pub mod summary;

pub use summary::{SummaryMemory, SummaryOptions};
