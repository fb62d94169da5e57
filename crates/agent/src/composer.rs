//! Prompt composition.
//!
//! A pure function of (selection, memory snapshot, user input). The same
//! inputs always yield the same message sequence.

use studymate_core::message::Message;
use studymate_core::selection::{Selection, Style, Subject};

const SYSTEM_TEMPLATE: &str = "你是{subject}领域的专家，请你回答用户提问。你应当礼貌拒绝与该学科无关的问题。你需要遵循以下讲解风格：{style}。";

/// The explanation-style instruction for each style.
pub fn style_description(style: Style) -> &'static str {
    match style {
        Style::Concise => {
            "仅提供直接答案和最少的必要解释。不要添加额外细节、发散讨论或无关信息。保持回答清晰、简洁，目标是为用户快速提供解决方案。"
        }
        Style::Detailed => {
            "第一，针对用户提问给出直接答案和清晰的解释；第二，基于此提供必要的相关知识点的信息，以补充背景或加深理解。"
        }
    }
}

/// Fill the system template with the subject label and style description.
pub fn system_instruction(subject: Subject, style: Style) -> String {
    SYSTEM_TEMPLATE
        .replace("{subject}", subject.label())
        .replace("{style}", style_description(style))
}

/// Build the prompt: system instruction, then memory context in its
/// original order, then the user's message.
///
/// Callers reject blank input before composing.
pub fn compose(selection: Selection, memory_context: &[Message], user_input: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(memory_context.len() + 2);
    messages.push(Message::system(system_instruction(
        selection.subject,
        selection.style,
    )));
    messages.extend(memory_context.iter().cloned());
    messages.push(Message::user(user_input));
    messages
}
