//! Completion service providers for StudyMate.
//!
//! All providers implement the `studymate_core::Provider` trait.
//! `build_from_config` picks and constructs the configured one.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{build_from_config, default_base_url};
