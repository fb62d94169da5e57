//! `studymate chat` — Interactive study chat.

use studymate_agent::TurnOutcome;
use studymate_channels::CliSurface;
use studymate_core::selection::{Selection, Style, Subject};
use studymate_core::surface::Surface;

use super::{Runtime, build_runtime, load_config, resolve_selection};

/// One line of chat input, classified.
#[derive(Debug, PartialEq)]
pub enum ChatCommand<'a> {
    Exit,
    Help,
    Summary,
    Subject(&'a str),
    Style(&'a str),
    Question(&'a str),
}

impl<'a> ChatCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if matches!(trimmed, "exit" | "quit" | "/exit" | "/quit" | ":q") {
            return Self::Exit;
        }
        match trimmed.split_once(char::is_whitespace) {
            Some(("/subject", arg)) => Self::Subject(arg.trim()),
            Some(("/style", arg)) => Self::Style(arg.trim()),
            _ => match trimmed {
                "/help" => Self::Help,
                "/summary" => Self::Summary,
                "/subject" => Self::Subject(""),
                "/style" => Self::Style(""),
                _ => Self::Question(line),
            },
        }
    }
}

fn labels<T>(all: &[T], label: fn(&T) -> &'static str) -> String {
    all.iter().map(label).collect::<Vec<_>>().join(" / ")
}

fn help_text() -> String {
    format!(
        concat!(
            "  /subject <学科>   切换学科 ({})\n",
            "  /style <风格>     切换讲解风格 ({})\n",
            "  /summary          查看当前对话摘要\n",
            "  /help             显示帮助\n",
            "  exit              退出",
        ),
        labels(&Subject::ALL, Subject::label),
        labels(&Style::ALL, Style::label),
    )
}

fn describe(selection: Selection) -> String {
    format!(
        "学科：{}  风格：{}",
        selection.subject.label(),
        selection.style.label()
    )
}

pub async fn run(
    subject: Option<String>,
    style: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let selection = resolve_selection(&config, subject.as_deref(), style.as_deref())?;
    let Runtime {
        orchestrator,
        mut session,
        mut selection,
    } = build_runtime(&config, selection)?;

    // The terminal already echoes what the user typed
    let surface = CliSurface::stdio().without_user_echo();
    surface.print_line("").await?;
    surface.print_line("  ╔══════════════════════════════════════════════╗").await?;
    surface.print_line("  ║          StudyMate — Interactive Mode          ║").await?;
    surface.print_line("  ╚══════════════════════════════════════════════╝").await?;
    surface.print_line("").await?;
    surface.print_line(&format!("  Model:     {}", config.model)).await?;
    surface.print_line(&format!("  {}", describe(selection))).await?;
    surface.print_line("  输入 /help 查看命令，exit 退出。").await?;
    surface.print_line("").await?;

    surface.render_transcript(session.transcript().messages()).await?;

    while let Some(line) = surface.read_next_input().await? {
        match ChatCommand::parse(&line) {
            ChatCommand::Exit => break,
            ChatCommand::Help => surface.print_line(&help_text()).await?,
            ChatCommand::Summary => {
                let summary = session.memory().summary();
                if summary.is_empty() {
                    surface.print_line("  （暂无摘要）").await?;
                } else {
                    surface.print_line(&format!("  摘要：{summary}")).await?;
                }
            }
            ChatCommand::Subject(label) => match label.parse::<Subject>() {
                Ok(subject) => {
                    selection.subject = subject;
                    surface.print_line(&format!("  {}", describe(selection))).await?;
                }
                Err(e) => surface.print_line(&format!("  {e}")).await?,
            },
            ChatCommand::Style(label) => match label.parse::<Style>() {
                Ok(style) => {
                    selection.style = style;
                    surface.print_line(&format!("  {}", describe(selection))).await?;
                }
                Err(e) => surface.print_line(&format!("  {e}")).await?,
            },
            ChatCommand::Question(text) => {
                let outcome = orchestrator
                    .handle_input(&mut session, selection, text, &surface)
                    .await;
                if let TurnOutcome::Replied {
                    memory_error: Some(e),
                    ..
                } = outcome
                {
                    tracing::debug!(error = %e, "Turn finished without a memory update");
                }
            }
        }
    }

    surface.print_line("").await?;
    surface.print_line("  再见！").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exit_words() {
        for word in ["exit", "quit", " /exit ", ":q"] {
            assert_eq!(ChatCommand::parse(word), ChatCommand::Exit);
        }
    }

    #[test]
    fn parses_selection_commands() {
        assert_eq!(ChatCommand::parse("/subject 数学"), ChatCommand::Subject("数学"));
        assert_eq!(ChatCommand::parse("/style   详细 "), ChatCommand::Style("详细"));
        assert_eq!(ChatCommand::parse("/subject"), ChatCommand::Subject(""));
    }

    #[test]
    fn everything_else_is_a_question() {
        assert_eq!(ChatCommand::parse("什么是导数？"), ChatCommand::Question("什么是导数？"));
        assert_eq!(ChatCommand::parse("   "), ChatCommand::Question("   "));
        assert_eq!(ChatCommand::parse("/summary"), ChatCommand::Summary);
        assert_eq!(ChatCommand::parse("/help"), ChatCommand::Help);
    }

    #[test]
    fn help_lists_every_label() {
        let help = help_text();
        for subject in Subject::ALL {
            assert!(help.contains(subject.label()));
        }
        for style in Style::ALL {
            assert!(help.contains(style.label()));
        }
    }
}
