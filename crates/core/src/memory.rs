//! ConversationMemory trait — the bounded context carried between turns.
//!
//! Memory exposes a prior-context snapshot for prompt composition and absorbs
//! each completed turn. Implementations must keep their state untouched when
//! `record` fails, so a later turn always sees a consistent (if stale) view.

use async_trait::async_trait;

use crate::error::MemoryUpdateError;
use crate::message::Message;

/// The core ConversationMemory trait.
///
/// Implementations: progressive LLM summary (`studymate-memory`).
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// The strategy name (e.g., "summary").
    fn name(&self) -> &str;

    /// Prior context to place between the system instruction and the new
    /// user message. Empty before the first recorded turn.
    fn snapshot(&self) -> Vec<Message>;

    /// Fold a completed turn into memory.
    async fn record(&mut self, user_text: &str, assistant_text: &str) -> Result<(), MemoryUpdateError>;

    /// The current compressed account of the conversation.
    fn summary(&self) -> &str;

    /// Number of turns successfully folded in so far.
    fn turns(&self) -> usize;
}
