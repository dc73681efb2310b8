//! Conversation history.

use serde::{Deserialize, Serialize};

/// Number of turns included in a prompt by default.
pub const DEFAULT_WINDOW: usize = 6;

/// Who a turn is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    ToolResult,
}

impl Role {
    /// Transcript label used when rendering a prompt.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::ToolResult => "Tool Result",
        }
    }
}

/// One unit of conversation content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn tool_result(content: impl Into<String>) -> Self {
        Self {
            role: Role::ToolResult,
            content: content.into(),
        }
    }

    /// `Label: content`
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.label(), self.content)
    }
}

/// Append-only log of turns.
///
/// Every turn is kept for the life of the process; only the view handed to
/// prompt construction is bounded.
#[derive(Debug, Clone, Default)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// The last `k` turns in insertion order.
    pub fn window(&self, k: usize) -> &[Turn] {
        window(&self.turns, k)
    }
}

/// The last `k` turns of `turns`, or all of them when there are fewer.
pub fn window(turns: &[Turn], k: usize) -> &[Turn] {
    &turns[turns.len().saturating_sub(k)..]
}
