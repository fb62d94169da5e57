//! Turn orchestration.
//!
//! One turn moves through
//! `Idle → AwaitingInput → Composing → Dispatching → UpdatingMemory → Idle`,
//! detouring through `Error` when the completion service or the memory
//! update fails. Side effects are strictly ordered: the transcript is
//! appended (and shown) before memory is touched, so a memory failure can
//! never take back a reply the user already saw.

use std::sync::Arc;

use chrono::Utc;
use studymate_config::AppConfig;
use studymate_core::error::{CompletionError, MemoryUpdateError};
use studymate_core::event::{DomainEvent, EventBus};
use studymate_core::message::Message;
use studymate_core::provider::{Provider, ProviderRequest};
use studymate_core::selection::Selection;
use studymate_core::surface::Surface;
use tracing::{debug, info, warn};

use crate::composer::compose;
use crate::session::{Session, SharedSession};

/// Lifecycle state of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingInput,
    Composing,
    Dispatching,
    UpdatingMemory,
    Error,
}

impl TurnState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnState::Idle => "idle",
            TurnState::AwaitingInput => "awaiting_input",
            TurnState::Composing => "composing",
            TurnState::Dispatching => "dispatching",
            TurnState::UpdatingMemory => "updating_memory",
            TurnState::Error => "error",
        }
    }
}

/// What happened to one submitted input.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Blank input; nothing was sent and nothing changed.
    Rejected,

    /// The reply was appended to the transcript. `memory_error` is set when
    /// the summary could not be updated and memory kept its pre-turn value.
    Replied {
        reply: String,
        memory_error: Option<MemoryUpdateError>,
    },

    /// The completion service failed. Transcript and memory are unchanged.
    Failed(CompletionError),
}

impl TurnOutcome {
    /// The assistant reply, if the turn produced one.
    pub fn reply(&self) -> Option<&str> {
        match self {
            TurnOutcome::Replied { reply, .. } => Some(reply),
            _ => None,
        }
    }
}

/// Drives turns against a [`Session`].
///
/// Holds no conversation state itself, so one orchestrator can serve many
/// sessions. Exclusive access to a session comes from `&mut Session` (or the
/// lock of a [`SharedSession`]).
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    event_bus: Arc<EventBus>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            event_bus: Arc::new(EventBus::default()),
        }
    }

    /// Orchestrator using the answer model settings from config.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    fn transition(&self, session: &mut Session, to: TurnState) {
        let from = session.state;
        session.state = to;
        debug!(session_id = %session.id(), from = from.as_str(), to = to.as_str(), "Turn state");
        self.event_bus.publish(DomainEvent::TurnStateChanged {
            session_id: session.id().to_string(),
            from: from.as_str().into(),
            to: to.as_str().into(),
            timestamp: Utc::now(),
        });
    }

    /// Run one full turn for `input`.
    ///
    /// Display calls are best-effort: a surface failure is logged and the
    /// turn still completes, so transcript and memory stay in step.
    pub async fn handle_input(
        &self,
        session: &mut Session,
        selection: Selection,
        input: &str,
        surface: &dyn Surface,
    ) -> TurnOutcome {
        self.transition(session, TurnState::AwaitingInput);

        if input.trim().is_empty() {
            debug!(session_id = %session.id(), "Ignoring blank input");
            self.transition(session, TurnState::Idle);
            return TurnOutcome::Rejected;
        }

        self.transition(session, TurnState::Composing);
        let prompt = compose(selection, &session.memory.snapshot(), input);

        self.transition(session, TurnState::Dispatching);
        info!(
            session_id = %session.id(),
            subject = %selection.subject,
            style = %selection.style,
            prompt_messages = prompt.len(),
            "Dispatching turn"
        );

        let request = ProviderRequest::new(self.model.clone(), prompt)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        display(surface.show_working(true).await);
        let result = self.provider.complete(request).await;
        display(surface.show_working(false).await);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(session_id = %session.id(), error = %e, "Completion failed");
                self.transition(session, TurnState::Error);
                self.event_bus.publish(DomainEvent::ErrorOccurred {
                    context: "completion".into(),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });

                let mut view = session.transcript.messages().to_vec();
                view.push(Message::assistant(error_notice(&e)));
                display(surface.render_transcript(&view).await);

                self.transition(session, TurnState::Idle);
                return TurnOutcome::Failed(e);
            }
        };

        if let Some(usage) = &response.usage {
            self.event_bus.publish(DomainEvent::ResponseGenerated {
                session_id: session.id().to_string(),
                model: response.model.clone(),
                tokens_used: usage.total_tokens,
                timestamp: Utc::now(),
            });
        }

        let reply = response.message.content;
        session.transcript.push_turn(input, reply.clone());
        display(surface.render_transcript(session.transcript.messages()).await);

        self.transition(session, TurnState::UpdatingMemory);
        let memory_error = match session.memory.record(input, &reply).await {
            Ok(()) => {
                self.event_bus.publish(DomainEvent::MemoryUpdated {
                    session_id: session.id().to_string(),
                    turns: session.memory.turns(),
                    summary_chars: session.memory.summary().chars().count(),
                    timestamp: Utc::now(),
                });
                None
            }
            Err(e) => {
                warn!(session_id = %session.id(), error = %e, "Memory update failed; keeping previous summary");
                self.transition(session, TurnState::Error);
                self.event_bus.publish(DomainEvent::ErrorOccurred {
                    context: "memory".into(),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                Some(e)
            }
        };

        self.transition(session, TurnState::Idle);
        TurnOutcome::Replied {
            reply,
            memory_error,
        }
    }

    /// [`handle_input`](Self::handle_input) under the session lock, held for
    /// the whole turn.
    pub async fn handle_shared_input(
        &self,
        session: &SharedSession,
        selection: Selection,
        input: &str,
        surface: &dyn Surface,
    ) -> TurnOutcome {
        let mut guard = session.lock().await;
        self.handle_input(&mut guard, selection, input, surface).await
    }
}

/// The assistant-role text shown in place of a reply.
fn error_notice(err: &CompletionError) -> String {
    if err.is_retryable() {
        format!("出错了：{err}。请稍后重新提交问题。")
    } else {
        format!("出错了：{err}")
    }
}

fn display(result: Result<(), studymate_core::error::SurfaceError>) {
    if let Err(e) = result {
        warn!(error = %e, "Display surface update failed");
    }
}
