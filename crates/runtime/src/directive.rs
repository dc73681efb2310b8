//! Tool directive parsing.
//!
//! The backend asks for a tool by writing a line such as
//!
//! ```text
//! TOOL_CALL: wikipedia_summary("Marie Curie")
//! ```
//!
//! anywhere in its output. Which tool names are recognized, and under which
//! parameter name the argument is passed, is data held in a [`DirectiveSet`].

use crate::tools::ToolArguments;
use thiserror::Error;

/// Literal marker that introduces a directive.
pub const MARKER: &str = "TOOL_CALL:";

const OPEN: &str = "(\"";
const CLOSE: &str = "\")";

/// A request to invoke one tool with one string argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDirective {
    pub tool_name: String,
    /// Parameter name the argument is passed under.
    pub parameter: String,
    pub argument: String,
}

impl ToolDirective {
    pub fn arguments(&self) -> ToolArguments {
        ToolArguments::single(&self.parameter, &self.argument)
    }
}

/// Malformed directive syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveParseError {
    #[error("directive for {tool} has no opening (\"")]
    MissingOpen { tool: String },
    #[error("directive for {tool} has no closing \")")]
    MissingClose { tool: String },
}

/// A tool the directive grammar recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveTool {
    pub name: String,
    pub parameter: String,
}

impl DirectiveTool {
    pub fn new(name: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter: parameter.into(),
        }
    }

    /// The directive line the backend is told to emit for this tool.
    pub fn example(&self) -> String {
        format!("{MARKER} {}(\"{}\")", self.name, self.parameter)
    }
}

/// The tools that directives may name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveSet {
    tools: Vec<DirectiveTool>,
}

impl Default for DirectiveSet {
    fn default() -> Self {
        Self::new(vec![DirectiveTool::new("wikipedia_summary", "topic")])
    }
}

impl DirectiveSet {
    pub fn new(tools: Vec<DirectiveTool>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[DirectiveTool] {
        &self.tools
    }

    /// Scan generated text for a directive naming any known tool.
    ///
    /// The first entry that yields a directive wins. A malformed directive
    /// for one entry does not hide a well-formed one for another; the first
    /// parse error is returned only when no entry matched.
    pub fn parse(&self, text: &str) -> Result<Option<ToolDirective>, DirectiveParseError> {
        let mut first_error = None;
        for tool in &self.tools {
            match parse(text, &tool.name) {
                Ok(Some(argument)) => {
                    return Ok(Some(ToolDirective {
                        tool_name: tool.name.clone(),
                        parameter: tool.parameter.clone(),
                        argument,
                    }));
                }
                Ok(None) => {}
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(_) => {}
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}

/// Extract the argument of a `TOOL_CALL: <tool_name>("<argument>")` directive.
///
/// Whitespace is allowed between the tool name and `("`. Mentions of the
/// name that are not followed by `("` are skipped.
///
/// Returns `Ok(None)` when the marker is absent or the tool name does not
/// follow it.
pub fn parse(text: &str, tool_name: &str) -> Result<Option<String>, DirectiveParseError> {
    let Some(marker) = text.find(MARKER) else {
        return Ok(None);
    };
    let rest = &text[marker + MARKER.len()..];
    if !rest.contains(tool_name) {
        return Ok(None);
    }

    let Some(argument) = rest.match_indices(tool_name).find_map(|(at, name)| {
        rest[at + name.len()..].trim_start().strip_prefix(OPEN)
    }) else {
        return Err(DirectiveParseError::MissingOpen {
            tool: tool_name.to_string(),
        });
    };

    let Some(close_at) = argument.find(CLOSE) else {
        return Err(DirectiveParseError::MissingClose {
            tool: tool_name.to_string(),
        });
    };

    Ok(Some(argument[..close_at].to_string()))
}
