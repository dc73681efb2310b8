//! Tool-related types.

use rmcp::model::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A tool advertised by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

impl From<Tool> for ToolDescriptor {
    fn from(tool: Tool) -> Self {
        Self {
            description: tool.description.as_deref().unwrap_or_default().to_string(),
            name: tool.name.into_owned(),
        }
    }
}

/// String arguments passed to a tool, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArguments(pub BTreeMap<String, String>);

impl ToolArguments {
    /// Arguments with a single parameter.
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(BTreeMap::from([(key.into(), value.into())]))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Convert into the JSON object shape used on the wire.
    pub fn to_json(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect()
    }
}

/// Normalized outcome of dispatching a directive.
///
/// Failures carry a message meant for the conversation, not an error value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ToolInvocationResult {
    Success(String),
    Failure(String),
}

impl ToolInvocationResult {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
