//! # StudyMate Core
//!
//! Domain types, traits, and error definitions for the StudyMate study
//! assistant. This crate has **no framework dependencies**: it defines the
//! domain model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Each collaborator of a chat turn is a trait here:
//! - [`Provider`] — the remote completion service
//! - [`ConversationMemory`] — the rolling conversation summary
//! - [`Surface`] — the display surface that renders and reads input
//!
//! Implementations live in their respective crates, so tests can swap any of
//! them for scripted stubs.

pub mod error;
pub mod event;
pub mod memory;
pub mod message;
pub mod provider;
pub mod selection;
pub mod surface;

// Re-export key types at crate root for ergonomics
pub use error::{CompletionError, ConfigurationError, Error, MemoryUpdateError, Result, SurfaceError};
pub use event::{DomainEvent, EventBus};
pub use memory::ConversationMemory;
pub use message::{Message, Role, SessionId, Transcript};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use selection::{Selection, Style, Subject};
pub use surface::Surface;
