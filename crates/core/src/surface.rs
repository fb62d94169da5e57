//! Surface trait — the abstraction over the interactive display.
//!
//! A Surface renders the transcript, hands over the next raw input line, and
//! shows a "working" indicator while a turn waits on the completion service.
//! Nothing else about the display leaks into the turn logic.

use async_trait::async_trait;

use crate::error::SurfaceError;
use crate::message::Message;

/// The core Surface trait.
///
/// Implementations: terminal (`studymate-channels`), scripted stubs in tests.
#[async_trait]
pub trait Surface: Send + Sync {
    /// Human-readable surface name (e.g., "cli").
    fn name(&self) -> &str;

    /// Show the given messages. Called with the full transcript, optionally
    /// followed by one ephemeral error message that is not part of it.
    async fn render_transcript(&self, messages: &[Message]) -> Result<(), SurfaceError>;

    /// Wait for the next raw input line. `None` means the user is done.
    async fn read_next_input(&self) -> Result<Option<String>, SurfaceError>;

    /// Toggle the "working" indicator.
    async fn show_working(&self, working: bool) -> Result<(), SurfaceError>;
}
