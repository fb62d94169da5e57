//! Error types for the StudyMate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator of a turn has its own error type; [`Error`] wraps them all.

use thiserror::Error;

/// The top-level error type for all StudyMate operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion service errors ---
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    // --- Memory errors ---
    #[error("Memory update error: {0}")]
    MemoryUpdate(#[from] MemoryUpdateError),

    // --- Display surface errors ---
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    // --- Configuration errors ---
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Per-collaborator errors ---

/// A subject, style, or setting value outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Unknown subject: '{0}' (expected 文学, 数学 or 计算机)")]
    UnknownSubject(String),

    #[error("Unknown explanation style: '{0}' (expected 简洁 or 详细)")]
    UnknownStyle(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// The completion service call failed.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl CompletionError {
    /// Whether re-submitting the same turn could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Network(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::AuthenticationFailed(_) | Self::NotConfigured(_) => false,
        }
    }
}

/// The summary could not be updated. Memory keeps its pre-turn value.
#[derive(Debug, Clone, Error)]
pub enum MemoryUpdateError {
    #[error("Summarization call failed: {0}")]
    Summarization(#[from] CompletionError),

    #[error("Summarizer returned an empty summary")]
    EmptySummary,
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Display surface I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Display surface closed")]
    Closed,
}
