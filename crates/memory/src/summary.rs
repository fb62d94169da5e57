//! Progressive-summary memory.
//!
//! After every completed turn the previous summary and the new exchange are
//! sent to the completion service, which returns a replacement summary. The
//! prompt therefore carries one summary message no matter how long the
//! conversation runs, at the cost of lossy compression of older detail.

use std::sync::Arc;

use async_trait::async_trait;
use studymate_config::AppConfig;
use studymate_core::error::MemoryUpdateError;
use studymate_core::memory::ConversationMemory;
use studymate_core::message::Message;
use studymate_core::provider::{Provider, ProviderRequest};
use tracing::debug;

const SUMMARY_PROMPT: &str = "\
Progressively summarize the lines of conversation provided, adding onto the previous \
summary and returning a new summary. Keep facts the user may refer back to; drop \
pleasantries and anything already covered.

EXAMPLE
Current summary:
The human asks what a limit is. The AI explains that a limit describes the value a \
function approaches.

New lines of conversation:
Human: And what is a derivative?
AI: The derivative is the limit of the difference quotient, the rate of change of a function.

New summary:
The human asks what a limit is. The AI explains that a limit describes the value a \
function approaches, then defines the derivative as the limit of the difference \
quotient, i.e. the function's rate of change.
END OF EXAMPLE

Current summary:
{summary}

New lines of conversation:
{new_lines}

New summary:";

/// Model settings for the summarization call.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl SummaryOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Options from `[summary]`, falling back to the answer model.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.summary_model().to_string(),
            temperature: config.summary.temperature,
            max_tokens: config.summary.max_tokens,
        }
    }
}

/// Conversation memory holding a single rolling summary.
pub struct SummaryMemory {
    provider: Arc<dyn Provider>,
    options: SummaryOptions,
    summary: String,
    turns: usize,
}

impl SummaryMemory {
    pub fn new(provider: Arc<dyn Provider>, options: SummaryOptions) -> Self {
        Self {
            provider,
            options,
            summary: String::new(),
            turns: 0,
        }
    }

    /// Render the summarization prompt for one new exchange.
    fn summarize_prompt(previous: &str, user_text: &str, assistant_text: &str) -> String {
        let new_lines = format!("Human: {user_text}\nAI: {assistant_text}");
        SUMMARY_PROMPT
            .replace("{summary}", previous)
            .replace("{new_lines}", &new_lines)
    }
}

#[async_trait]
impl ConversationMemory for SummaryMemory {
    fn name(&self) -> &str {
        "summary"
    }

    fn snapshot(&self) -> Vec<Message> {
        if self.turns == 0 {
            return Vec::new();
        }
        vec![Message::system(self.summary.clone())]
    }

    async fn record(&mut self, user_text: &str, assistant_text: &str) -> Result<(), MemoryUpdateError> {
        let prompt = Self::summarize_prompt(&self.summary, user_text, assistant_text);
        let request = ProviderRequest::new(self.options.model.clone(), vec![Message::user(prompt)])
            .with_temperature(self.options.temperature)
            .with_max_tokens(self.options.max_tokens);

        // State is only touched once a usable summary is back.
        let response = self.provider.complete(request).await?;
        let next = response.message.content.trim();
        if next.is_empty() {
            return Err(MemoryUpdateError::EmptySummary);
        }

        self.summary = next.to_string();
        self.turns += 1;

        debug!(
            turns = self.turns,
            summary_chars = self.summary.chars().count(),
            "Conversation summary updated"
        );
        Ok(())
    }

    fn summary(&self) -> &str {
        &self.summary
    }

    fn turns(&self) -> usize {
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use studymate_core::error::CompletionError;
    use studymate_core::provider::ProviderResponse;

    /// Returns scripted replies in order and keeps every request it saw.
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<String, CompletionError>>>,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, CompletionError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ProviderRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, CompletionError> {
            self.requests.lock().unwrap().push(request);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .expect("ScriptedProvider ran out of replies")?;
            Ok(ProviderResponse {
                message: Message::assistant(reply),
                usage: None,
                model: "scripted-model".into(),
            })
        }
    }

    fn memory(provider: Arc<ScriptedProvider>) -> SummaryMemory {
        SummaryMemory::new(provider, SummaryOptions::new("summary-model"))
    }

    #[test]
    fn empty_memory_has_empty_snapshot() {
        let mem = memory(ScriptedProvider::new(vec![]));
        assert!(mem.snapshot().is_empty());
        assert_eq!(mem.turns(), 0);
        assert_eq!(mem.summary(), "");
    }

    #[tokio::test]
    async fn record_replaces_summary_with_service_output() {
        let provider = ScriptedProvider::new(vec![Ok("  用户问了导数的定义。 ".into())]);
        let mut mem = memory(provider.clone());

        mem.record("什么是导数？", "导数是函数变化率。").await.unwrap();

        assert_eq!(mem.summary(), "用户问了导数的定义。");
        assert_eq!(mem.turns(), 1);
        assert_eq!(mem.snapshot(), vec![Message::system("用户问了导数的定义。")]);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "summary-model");
        assert_eq!(requests[0].messages.len(), 1);
        let prompt = &requests[0].messages[0].content;
        assert!(prompt.contains("Human: 什么是导数？\nAI: 导数是函数变化率。"));
    }

    #[tokio::test]
    async fn second_record_sends_previous_summary() {
        let provider = ScriptedProvider::new(vec![Ok("S1".into()), Ok("S2".into())]);
        let mut mem = memory(provider.clone());

        mem.record("q1", "a1").await.unwrap();
        mem.record("q2", "a2").await.unwrap();

        let second_prompt = &provider.requests()[1].messages[0].content;
        assert!(second_prompt.contains("Current summary:\nS1\n"));
        assert!(second_prompt.contains("Human: q2\nAI: a2"));
        assert!(!second_prompt.contains("Human: q1"));
        assert_eq!(mem.summary(), "S2");
    }

    #[tokio::test]
    async fn snapshot_stays_a_single_message() {
        let replies = (0..20).map(|i| Ok(format!("summary v{i}"))).collect();
        let mut mem = memory(ScriptedProvider::new(replies));

        for i in 0..20 {
            mem.record(&format!("question {i}"), &format!("answer {i}")).await.unwrap();
        }

        let snapshot = mem.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].content, "summary v19");
        assert!(!snapshot[0].content.contains("question 0"));
        assert_eq!(mem.turns(), 20);
    }

    #[tokio::test]
    async fn failed_summarization_keeps_previous_state() {
        let provider = ScriptedProvider::new(vec![
            Ok("S1".into()),
            Err(CompletionError::Timeout("30s".into())),
        ]);
        let mut mem = memory(provider);
        mem.record("q1", "a1").await.unwrap();
        let before = mem.snapshot();

        let err = mem.record("q2", "a2").await.unwrap_err();

        assert!(matches!(err, MemoryUpdateError::Summarization(CompletionError::Timeout(_))));
        assert_eq!(mem.snapshot(), before);
        assert_eq!(mem.turns(), 1);
    }

    #[tokio::test]
    async fn blank_summary_is_rejected() {
        let mut mem = memory(ScriptedProvider::new(vec![Ok("   \n".into())]));

        let err = mem.record("q", "a").await.unwrap_err();

        assert!(matches!(err, MemoryUpdateError::EmptySummary));
        assert!(mem.snapshot().is_empty());
    }

    #[test]
    fn options_follow_config() {
        let mut config = AppConfig::default();
        config.summary.max_tokens = Some(300);
        let options = SummaryOptions::from_config(&config);
        assert_eq!(options.model, "deepseek-chat");
        assert_eq!(options.max_tokens, Some(300));
        assert_eq!(options.temperature, 0.0);
    }
}
