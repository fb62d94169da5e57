//! The turn pipeline of StudyMate.
//!
//! Each user question goes through three explicit steps:
//!
//! 1. **Compose** — system instruction (subject + style) + memory snapshot + question
//! 2. **Dispatch** — send the prompt to the completion service
//! 3. **Record** — append the exchange to the transcript, then fold it into memory
//!
//! The [`Orchestrator`] owns that sequence; the [`Session`] owns the state it
//! writes to.

pub mod composer;
pub mod orchestrator;
pub mod session;

pub use composer::{compose, style_description, system_instruction};
pub use orchestrator::{Orchestrator, TurnOutcome, TurnState};
pub use session::{Session, SharedSession};
