//! Display surfaces for StudyMate.
//!
//! A surface renders the transcript, reads the next question and shows a
//! working indicator while a reply is pending. The orchestrator talks to it
//! only through [`Surface`](studymate_core::surface::Surface).
//!
//! Available surfaces:
//! - **CLI** — Interactive terminal chat (stdin/stdout)

pub mod cli;

pub use cli::CliSurface;
