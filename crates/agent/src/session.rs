//! Session — the explicit owner of one conversation's state.
//!
//! Created when a chat starts and dropped when it ends. Only the
//! [`Orchestrator`](crate::Orchestrator) writes to it; everyone else gets
//! read-only views.

use std::sync::Arc;

use studymate_core::memory::ConversationMemory;
use studymate_core::message::{SessionId, Transcript};
use tokio::sync::Mutex;

use crate::orchestrator::TurnState;

/// A session behind a per-session lock, for callers that share one session
/// across tasks. The lock is held for a whole turn.
pub type SharedSession = Arc<Mutex<Session>>;

pub struct Session {
    id: SessionId,
    pub(crate) state: TurnState,
    pub(crate) transcript: Transcript,
    pub(crate) memory: Box<dyn ConversationMemory>,
}

impl Session {
    /// Start a session whose transcript opens with `greeting`.
    ///
    /// The greeting is display-only and never reaches memory.
    pub fn new(memory: Box<dyn ConversationMemory>, greeting: impl Into<String>) -> Self {
        let id = SessionId::new();
        Self {
            transcript: Transcript::with_greeting(id.clone(), greeting),
            id,
            state: TurnState::Idle,
            memory,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Where the current (or last) turn is in its lifecycle.
    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn memory(&self) -> &dyn ConversationMemory {
        self.memory.as_ref()
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("transcript_len", &self.transcript.len())
            .field("memory", &self.memory.name())
            .field("memory_turns", &self.memory.turns())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use studymate_core::error::MemoryUpdateError;
    use studymate_core::message::Message;

    struct NullMemory;

    #[async_trait]
    impl ConversationMemory for NullMemory {
        fn name(&self) -> &str {
            "null"
        }
        fn snapshot(&self) -> Vec<Message> {
            Vec::new()
        }
        async fn record(&mut self, _: &str, _: &str) -> Result<(), MemoryUpdateError> {
            Ok(())
        }
        fn summary(&self) -> &str {
            ""
        }
        fn turns(&self) -> usize {
            0
        }
    }

    #[test]
    fn new_session_shows_greeting_only() {
        let session = Session::new(Box::new(NullMemory), "你好，我是你的学习助手！");
        assert_eq!(
            session.transcript().messages(),
            &[Message::assistant("你好，我是你的学习助手！")]
        );
        assert!(session.memory().snapshot().is_empty());
        assert_eq!(session.state(), TurnState::Idle);
        assert_eq!(&session.transcript().session_id, session.id());
    }

    #[tokio::test]
    async fn shared_session_locks() {
        let shared = Session::new(Box::new(NullMemory), "hi").into_shared();
        let guard = shared.lock().await;
        assert!(shared.try_lock().is_err());
        drop(guard);
        assert!(shared.try_lock().is_ok());
    }
}
