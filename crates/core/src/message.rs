//! Message and Transcript domain types.
//!
//! These are the value objects that flow through a turn:
//! User types a question → Composer builds a prompt → Provider replies → Transcript shows it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (subject, style, conversation summary)
    System,
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message. Immutable once created.
///
/// Deliberately carries no id or timestamp: two messages with the same role
/// and content are equal, which keeps prompt composition reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The display-facing, append-only history of a session.
///
/// Holds the greeting and every completed turn verbatim, unlike the
/// conversation summary which only keeps a compressed account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// The session this transcript belongs to
    pub session_id: SessionId,

    messages: Vec<Message>,

    /// When this transcript was created
    pub created_at: DateTime<Utc>,

    /// When the last message was appended
    pub updated_at: DateTime<Utc>,
}

impl Transcript {
    /// Create a transcript that opens with an assistant greeting.
    pub fn with_greeting(session_id: SessionId, greeting: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            messages: vec![Message::assistant(greeting)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Append one completed turn. Both messages land together.
    pub fn push_turn(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.updated_at = Utc::now();
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::assistant(assistant_text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
