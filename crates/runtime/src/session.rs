//! Session management.

use crate::directive::{DirectiveSet, ToolDirective};
use crate::gateway::{Backend, GatewayError};
use crate::history::{DEFAULT_WINDOW, History, Turn};
use crate::prompt::{SYNTHESIZE_INSTRUCTION, build_prompt, system_preamble};
use crate::tools::{ToolHost, ToolInvocationResult, dispatch};
use tracing::{debug, info, warn};

/// A tool call made while answering one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExchange {
    pub directive: ToolDirective,
    pub result: ToolInvocationResult,
}

/// Outcome of one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The final assistant text, recorded in history.
    Answer {
        text: String,
        tool: Option<ToolExchange>,
    },
    /// A generation call failed; nothing was recorded for the assistant.
    Failed {
        error: GatewayError,
        tool: Option<ToolExchange>,
    },
}

impl Reply {
    /// Text to show the user.
    pub fn text(&self) -> String {
        match self {
            Self::Answer { text, .. } => text.clone(),
            Self::Failed { error, .. } => format!("Error: {error}"),
        }
    }

    pub fn tool(&self) -> Option<&ToolExchange> {
        match self {
            Self::Answer { tool, .. } | Self::Failed { tool, .. } => tool.as_ref(),
        }
    }
}

/// A conversation between the user, a backend, and a tool host.
///
/// Turns run strictly one after another; the session owns the tool host
/// for its whole lifetime.
pub struct Session<B, T> {
    backend: B,
    tools: T,
    directives: DirectiveSet,
    history: History,
    preamble: String,
    window: usize,
    model: Option<String>,
}

impl<B: Backend, T: ToolHost> Session<B, T> {
    /// Create a session over a bootstrapped tool host.
    pub fn new(backend: B, tools: T) -> Self {
        let directives = DirectiveSet::default();
        let preamble = system_preamble(tools.catalog(), &directives);
        Self {
            backend,
            tools,
            directives,
            history: History::new(),
            preamble,
            window: DEFAULT_WINDOW,
            model: None,
        }
    }

    /// Replace the recognized directive tools.
    pub fn with_directives(mut self, directives: DirectiveSet) -> Self {
        self.preamble = system_preamble(self.tools.catalog(), &directives);
        self.directives = directives;
        self
    }

    /// Set how many turns each prompt includes.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Request a model other than the backend default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Give back the tool host so it can be shut down.
    pub fn into_tools(self) -> T {
        self.tools
    }

    /// The prompt for the current history.
    pub fn prompt(&self, instruction: Option<&str>) -> String {
        build_prompt(&self.preamble, self.history.window(self.window), instruction)
    }

    async fn generate(&self, instruction: Option<&str>) -> Result<String, GatewayError> {
        let prompt = self.prompt(instruction);
        self.backend.generate(&prompt, self.model.as_deref()).await
    }

    fn answer(&mut self, text: String, tool: Option<ToolExchange>) -> Reply {
        self.history.push(Turn::assistant(text.clone()));
        debug!(turns = self.history.len(), "recorded assistant turn");
        Reply::Answer { text, tool }
    }

    /// Process one user turn.
    ///
    /// Only the first generation is scanned for a directive; tool output
    /// and the regenerated answer are never parsed.
    pub async fn chat(&mut self, input: &str) -> Reply {
        self.history.push(Turn::user(input));

        let generated = match self.generate(None).await {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "generation failed");
                return Reply::Failed { error, tool: None };
            }
        };

        let directive = match self.directives.parse(&generated) {
            Ok(Some(directive)) => directive,
            Ok(None) => return self.answer(generated, None),
            Err(e) => {
                warn!(error = %e, "malformed tool directive, using raw text");
                return self.answer(generated, None);
            }
        };

        info!(
            tool = directive.tool_name.as_str(),
            argument = directive.argument.as_str(),
            "tool directive detected"
        );
        let result = dispatch(&self.tools, &directive).await;

        self.history.push(Turn::tool_result(format!(
            "[Retrieved {} for \"{}\"]",
            directive.tool_name, directive.argument
        )));
        self.history.push(Turn::tool_result(result.text()));

        let tool = Some(ToolExchange { directive, result });
        match self.generate(Some(SYNTHESIZE_INSTRUCTION)).await {
            Ok(text) => self.answer(text, tool),
            Err(error) => {
                warn!(%error, "generation after tool call failed");
                Reply::Failed { error, tool }
            }
        }
    }
}
