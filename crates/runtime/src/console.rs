//! Line-oriented console loop.

use crate::gateway::Backend;
use crate::session::Session;
use crate::tools::ToolHost;
use crate::Result;
use std::io::{BufRead, Write};
use tracing::debug;

/// Prompt shown before reading a user line.
pub const USER_PROMPT: &str = "You: ";

/// What a line of user input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line; ignored.
    Empty,
    /// `quit` or `exit`, in any case.
    Exit,
    Message(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let input = line.trim();
        if input.is_empty() {
            Self::Empty
        } else if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            Self::Exit
        } else {
            Self::Message(input.to_string())
        }
    }
}

/// Print the start-of-chat banner.
pub fn banner(mut output: impl Write) -> std::io::Result<()> {
    let rule = "=".repeat(60);
    writeln!(output, "\n{rule}")?;
    writeln!(output, "Chat with tool access")?;
    writeln!(output, "Type 'quit' or 'exit' to end the session")?;
    writeln!(output, "{rule}\n")
}

/// Run the conversation until the user exits or input ends.
pub async fn run<B, T, R, W>(session: &mut Session<B, T>, mut input: R, mut output: W) -> Result<()>
where
    B: Backend,
    T: ToolHost,
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{USER_PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            debug!("input closed");
            break;
        }

        let message = match Command::parse(&line) {
            Command::Empty => continue,
            Command::Exit => break,
            Command::Message(message) => message,
        };

        let reply = session.chat(&message).await;

        write!(output, "\nAssistant: ")?;
        if let Some(exchange) = reply.tool() {
            writeln!(
                output,
                "[Calling {} with: {}]\n\n{}\n",
                exchange.directive.tool_name,
                exchange.directive.argument,
                exchange.result.text()
            )?;
        }
        writeln!(output, "{}\n", reply.text())?;
    }

    writeln!(output, "Goodbye!")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, ModelEndpoint, OllamaBackend};
    use crate::testing::{FakeToolHost, ScriptedBackend, spawn_generate_backend};
    use axum::http::StatusCode;
    use std::io::Cursor;
    use std::time::Duration;

    async fn transcript<B: Backend>(session: &mut Session<B, FakeToolHost>, input: &str) -> String {
        let mut output = Vec::new();
        run(session, Cursor::new(input.to_string()), &mut output)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("   \n"), Command::Empty);
        assert_eq!(Command::parse("QUIT\n"), Command::Exit);
        assert_eq!(Command::parse(" Exit "), Command::Exit);
        assert_eq!(Command::parse("quitting time"), Command::Message("quitting time".into()));
        assert_eq!(Command::parse("  hi  \n"), Command::Message("hi".into()));
    }

    #[tokio::test]
    async fn blank_lines_do_not_consume_turns() {
        let mut session = Session::new(ScriptedBackend::texts(&["Hello!"]), FakeToolHost::wikipedia());

        let out = transcript(&mut session, "\n   \nhi\nQuit\nnever read\n").await;

        assert!(out.contains("Assistant: Hello!"));
        assert!(out.trim_end().ends_with("Goodbye!"));
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn end_of_input_terminates() {
        let mut session = Session::new(ScriptedBackend::texts(&[]), FakeToolHost::wikipedia());
        let out = transcript(&mut session, "").await;
        assert_eq!(out, format!("{USER_PROMPT}Goodbye!\n"));
    }

    #[tokio::test]
    async fn tool_call_is_shown_before_answer() {
        let backend = ScriptedBackend::texts(&[
            "TOOL_CALL: wikipedia_summary(\"Marie Curie\")",
            "She discovered polonium and radium.",
        ]);
        let mut session = Session::new(backend, FakeToolHost::wikipedia());

        let out = transcript(&mut session, "Tell me about Marie Curie\nexit\n").await;

        let call = out.find("[Calling wikipedia_summary with: Marie Curie]").unwrap();
        let summary = out.find("Summary of Marie Curie.").unwrap();
        let answer = out.find("She discovered polonium and radium.").unwrap();
        assert!(call < summary && summary < answer);
    }

    #[tokio::test]
    async fn gateway_error_is_printed_and_loop_continues() {
        let backend = ScriptedBackend::new([
            Err(GatewayError::Status { code: 500 }),
            Ok("Working now.".to_string()),
        ]);
        let mut session = Session::new(backend, FakeToolHost::wikipedia());

        let out = transcript(&mut session, "first\nsecond\nexit\n").await;

        assert!(out.contains("Error: generation backend returned status 500"));
        assert!(out.contains("Assistant: Working now."));
        assert!(out.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn http_500_backend_does_not_end_session() {
        let endpoint =
            spawn_generate_backend(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
        let backend = OllamaBackend::builder(ModelEndpoint::new("llama3.2", endpoint)).build();
        let mut session = Session::new(backend, FakeToolHost::wikipedia());

        let out = transcript(&mut session, "hello\nhello again\nquit\n").await;

        assert_eq!(out.matches("500").count(), 2);
        assert_eq!(out.matches(USER_PROMPT).count(), 3);
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn banner_mentions_exit_commands() {
        let mut out = Vec::new();
        banner(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("'quit' or 'exit'"));
    }
}
