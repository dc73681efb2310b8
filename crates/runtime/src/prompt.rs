//! Prompt construction.

use crate::directive::DirectiveSet;
use crate::history::Turn;
use crate::tools::ToolDescriptor;

/// Appended after the window when asking for an answer built from a tool result.
pub const SYNTHESIZE_INSTRUCTION: &str =
    "Please provide a helpful response based on the tool result above.";

/// Build the system preamble advertising the catalog.
///
/// Only directive tools present in the catalog get a usage line.
pub fn system_preamble(catalog: &[ToolDescriptor], directives: &DirectiveSet) -> String {
    let listing = catalog
        .iter()
        .map(|tool| format!("- {}: {}", tool.name, tool.description))
        .collect::<Vec<_>>()
        .join("\n");

    let mut preamble =
        format!("You are a helpful assistant with access to the following tools:\n\n{listing}\n");

    for tool in directives
        .tools()
        .iter()
        .filter(|d| catalog.iter().any(|t| t.name == d.name))
    {
        preamble.push_str(&format!(
            "\nWhen a user asks about something the {} tool can help with, respond with:\n{}\n",
            tool.name,
            tool.example()
        ));
    }

    preamble.push_str("\nOtherwise, answer normally. Be concise and helpful.");
    preamble
}

/// Preamble, windowed turns, optional instruction, and the assistant cue.
pub fn build_prompt(preamble: &str, window: &[Turn], instruction: Option<&str>) -> String {
    let conversation = window.iter().map(Turn::render).collect::<Vec<_>>().join("\n");
    match instruction {
        Some(instruction) => {
            format!("{preamble}\n\nConversation:\n{conversation}\n\n{instruction}\nAssistant: ")
        }
        None => format!("{preamble}\n\nConversation:\n{conversation}\nAssistant: "),
    }
}
