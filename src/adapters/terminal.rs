//! Terminal chat front-end.
//!
//! Reads lines from any async reader and renders the conversation to any
//! async writer. Enter submits; a line ending in `\` continues the message on
//! the next line. While a turn is in flight a waiting indicator is printed.
//!
//! Commands, entered as a whole message:
//! - `/history` prints the whole conversation
//! - `/quit` or `/exit` ends the session

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::{ConversationController, IgnoredReason, SubmitOutcome};
use crate::domain::chat::{Message, Role};

/// Shown while the conversation is empty.
pub const GREETING: &str = "안녕하세요! 무엇을 도와드릴까요?";

const WAITING: &str = "답변을 작성하고 있어요";
const TICK: Duration = Duration::from_millis(400);

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "나",
        Role::Assistant => "핏코치 민트",
    }
}

fn render(message: &Message) -> String {
    format!(
        "[{}] {}: {}\n",
        message.created_at().clock_label(),
        role_label(message.role()),
        message.content()
    )
}

/// Runs an interactive session until `/quit`, `/exit` or end of input.
pub async fn run_chat<R, W>(
    controller: &ConversationController,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if controller.messages().is_empty() {
        output.write_all(format!("{GREETING}\n").as_bytes()).await?;
    }

    let mut lines = input.lines();
    let mut pending = String::new();

    loop {
        let prompt = if pending.is_empty() { "> " } else { ". " };
        output.write_all(prompt.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            if !pending.is_empty() {
                output.write_all(b"\n").await?;
                submit(controller, std::mem::take(&mut pending), output).await?;
            }
            break;
        };

        if let Some(continued) = line.strip_suffix('\\') {
            pending.push_str(continued);
            pending.push('\n');
            continue;
        }
        pending.push_str(&line);

        let trimmed = pending.trim();
        if trimmed == "/quit" || trimmed == "/exit" {
            break;
        }
        if trimmed == "/history" {
            pending.clear();
            for message in controller.messages() {
                output.write_all(render(&message).as_bytes()).await?;
            }
            continue;
        }

        submit(controller, std::mem::take(&mut pending), output).await?;
    }

    output.flush().await
}

async fn submit<W>(controller: &ConversationController, text: String, output: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    controller.set_input(text);
    if !controller.can_submit() {
        return Ok(());
    }

    let turn = controller.submit();
    tokio::pin!(turn);

    output.write_all(WAITING.as_bytes()).await?;
    output.flush().await?;
    let mut ticker = tokio::time::interval(TICK);
    ticker.tick().await;

    let outcome = loop {
        tokio::select! {
            outcome = &mut turn => break outcome,
            _ = ticker.tick() => {
                output.write_all(b".").await?;
                output.flush().await?;
            }
        }
    };
    output.write_all(b"\n").await?;

    match outcome {
        Ok(SubmitOutcome::Ignored(IgnoredReason::Busy)) => {
            output.write_all("이전 답변을 기다리는 중입니다.\n".as_bytes()).await?;
        }
        Ok(SubmitOutcome::Ignored(IgnoredReason::EmptyInput)) => {}
        Ok(outcome) => {
            if let Some(message) = outcome.assistant_message() {
                output.write_all(render(message).as_bytes()).await?;
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "conversation rejected the turn");
            output.write_all(format!("대화 오류: {err}\n").as_bytes()).await?;
        }
    }
    output.flush().await
}
