//! `studymate ask` — Single question, single answer.

use studymate_agent::TurnOutcome;
use studymate_channels::CliSurface;
use tokio::io::{self, AsyncBufRead, AsyncWrite, BufReader};

use super::{Runtime, build_runtime, load_config, resolve_selection};

pub async fn run(
    message: String,
    subject: Option<String>,
    style: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let selection = resolve_selection(&config, subject.as_deref(), style.as_deref())?;
    let runtime = build_runtime(&config, selection)?;

    let surface = CliSurface::new(BufReader::new(io::empty()), io::stdout()).without_user_echo();
    answer(runtime, &message, &surface).await
}

/// Run one turn, printing only the reply.
///
/// The reply is rendered as soon as it arrives, before the summary call.
pub async fn answer<R, W>(
    runtime: Runtime,
    message: &str,
    surface: &CliSurface<R, W>,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let Runtime {
        orchestrator,
        mut session,
        selection,
    } = runtime;

    surface.mark_shown(session.transcript().messages()).await;

    match orchestrator
        .handle_input(&mut session, selection, message, surface)
        .await
    {
        TurnOutcome::Replied { .. } => Ok(()),
        TurnOutcome::Rejected => Err("The question is empty.".into()),
        TurnOutcome::Failed(e) => Err(e.into()),
    }
}
