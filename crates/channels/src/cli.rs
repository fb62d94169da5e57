//! CLI surface — interactive terminal-based chat.
//!
//! Reads questions line by line and prints the part of the transcript that
//! changed since the last render. Used for `studymate chat` and `studymate ask`.

use async_trait::async_trait;
use studymate_core::error::SurfaceError;
use studymate_core::message::{Message, Role};
use studymate_core::surface::Surface;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::debug;

const WORKING_TEXT: &str = "  思考中...";

/// Terminal surface over any line reader and writer.
pub struct CliSurface<R, W> {
    lines: Mutex<Lines<R>>,
    out: Mutex<W>,
    shown: Mutex<Vec<Message>>,
    echo_user: bool,
}

impl CliSurface<BufReader<io::Stdin>, io::Stdout> {
    /// Surface over the process stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> CliSurface<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            out: Mutex::new(writer),
            shown: Mutex::new(Vec::new()),
            echo_user: true,
        }
    }

    /// Do not print user messages. For terminals that already echo what the
    /// user typed, and for one-shot questions given on the command line.
    pub fn without_user_echo(mut self) -> Self {
        self.echo_user = false;
        self
    }

    /// Treat `messages` as already on screen without printing them.
    pub async fn mark_shown(&self, messages: &[Message]) {
        *self.shown.lock().await = messages.to_vec();
    }

    /// Write a free-form line (banners, command feedback).
    pub async fn print_line(&self, text: &str) -> Result<(), SurfaceError> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }

    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "你",
        Role::Assistant => "助手",
        Role::System => "系统",
    }
}

/// Length of the shared prefix of two message lists.
fn common_prefix(a: &[Message], b: &[Message]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[async_trait]
impl<R, W> Surface for CliSurface<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        "cli"
    }

    async fn render_transcript(&self, messages: &[Message]) -> Result<(), SurfaceError> {
        let mut shown = self.shown.lock().await;
        let start = common_prefix(&shown, messages);

        let mut out = self.out.lock().await;
        for message in &messages[start..] {
            if message.role == Role::User && !self.echo_user {
                continue;
            }
            let mut lines = message.content.lines();
            let first = lines.next().unwrap_or_default();
            let text = format!("  {} > {first}\n", speaker(message.role));
            out.write_all(text.as_bytes()).await?;
            for line in lines {
                out.write_all(format!("    {line}\n").as_bytes()).await?;
            }
        }
        out.flush().await?;

        *shown = messages.to_vec();
        Ok(())
    }

    async fn read_next_input(&self) -> Result<Option<String>, SurfaceError> {
        {
            let mut out = self.out.lock().await;
            out.write_all("  你 > ".as_bytes()).await?;
            out.flush().await?;
        }
        let line = self.lines.lock().await.next_line().await?;
        if line.is_none() {
            // EOF (Ctrl+D) ends the chat
            debug!("Input closed");
        }
        Ok(line)
    }

    async fn show_working(&self, working: bool) -> Result<(), SurfaceError> {
        let mut out = self.out.lock().await;
        if working {
            out.write_all(WORKING_TEXT.as_bytes()).await?;
        } else {
            out.write_all(b"\r\x1b[2K").await?;
        }
        out.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(input: &'static str) -> CliSurface<BufReader<&'static [u8]>, Vec<u8>> {
        CliSurface::new(BufReader::new(input.as_bytes()), Vec::new())
    }

    fn output(surface: CliSurface<BufReader<&'static [u8]>, Vec<u8>>) -> String {
        String::from_utf8(surface.into_writer()).unwrap()
    }

    #[tokio::test]
    async fn reads_lines_until_eof() {
        let s = surface("什么是导数？\n\n");
        assert_eq!(s.read_next_input().await.unwrap().as_deref(), Some("什么是导数？"));
        assert_eq!(s.read_next_input().await.unwrap().as_deref(), Some(""));
        assert_eq!(s.read_next_input().await.unwrap(), None);
    }

    #[tokio::test]
    async fn renders_only_new_messages() {
        let s = surface("");
        let greeting = vec![Message::assistant("你好，我是你的学习助手！")];
        s.render_transcript(&greeting).await.unwrap();

        let mut turn = greeting.clone();
        turn.push(Message::user("问题"));
        turn.push(Message::assistant("回答"));
        s.render_transcript(&turn).await.unwrap();

        let out = output(s);
        assert_eq!(out.matches("你好，我是你的学习助手！").count(), 1);
        assert!(out.contains("  你 > 问题\n"));
        assert!(out.contains("  助手 > 回答\n"));
    }

    #[tokio::test]
    async fn ephemeral_error_does_not_hide_the_next_turn() {
        let s = surface("");
        let base = vec![Message::assistant("hi")];
        s.render_transcript(&base).await.unwrap();

        let mut with_error = base.clone();
        with_error.push(Message::assistant("出错了：timeout"));
        s.render_transcript(&with_error).await.unwrap();

        let mut next = base.clone();
        next.push(Message::user("重试"));
        next.push(Message::assistant("好的"));
        s.render_transcript(&next).await.unwrap();

        let out = output(s);
        assert!(out.contains("出错了：timeout"));
        assert!(out.contains("  你 > 重试\n"));
        assert!(out.contains("  助手 > 好的\n"));
    }

    #[tokio::test]
    async fn typed_questions_are_not_echoed_back() {
        let s = surface("问题\n").without_user_echo();
        let greeting = vec![Message::assistant("hi")];
        s.render_transcript(&greeting).await.unwrap();
        let question = s.read_next_input().await.unwrap().unwrap();

        let mut turn = greeting.clone();
        turn.push(Message::user(question));
        turn.push(Message::assistant("回答"));
        s.render_transcript(&turn).await.unwrap();

        let out = output(s);
        assert!(!out.contains("问题"));
        assert!(out.ends_with("  你 >   助手 > 回答\n"));
    }

    #[tokio::test]
    async fn marked_messages_are_skipped() {
        let s = surface("").without_user_echo();
        let greeting = vec![Message::assistant("你好")];
        s.mark_shown(&greeting).await;

        let mut turn = greeting.clone();
        turn.push(Message::user("什么是导数？"));
        turn.push(Message::assistant("导数是函数变化率。"));
        s.render_transcript(&turn).await.unwrap();

        assert_eq!(output(s), "  助手 > 导数是函数变化率。\n");
    }

    #[tokio::test]
    async fn multiline_replies_are_indented() {
        let s = surface("");
        s.render_transcript(&[Message::assistant("第一行\n第二行")])
            .await
            .unwrap();
        assert_eq!(output(s), "  助手 > 第一行\n    第二行\n");
    }

    #[tokio::test]
    async fn working_indicator_is_cleared() {
        let s = surface("");
        s.show_working(true).await.unwrap();
        s.show_working(false).await.unwrap();
        let out = output(s);
        assert!(out.starts_with(WORKING_TEXT));
        assert!(out.ends_with("\r\x1b[2K"));
    }

    #[test]
    fn surface_name() {
        assert_eq!(surface("").name(), "cli");
    }
}
