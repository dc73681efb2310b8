//! Directive dispatch.

use super::{ToolHost, ToolInvocationResult};
use crate::directive::ToolDirective;
use tracing::{info, warn};

/// Invoke the tool a directive names and normalize the outcome.
///
/// Tool failures are returned as [`ToolInvocationResult::Failure`] so the
/// conversation can report them; nothing here is fatal to the loop.
pub async fn dispatch<T: ToolHost>(host: &T, directive: &ToolDirective) -> ToolInvocationResult {
    let tool = directive.tool_name.as_str();
    info!(tool, argument = directive.argument.as_str(), "dispatching tool call");

    match host.invoke(tool, &directive.arguments()).await {
        Ok(text) => ToolInvocationResult::Success(text),
        Err(e) => {
            warn!(tool, error = %e, "tool call failed");
            ToolInvocationResult::Failure(format!("The {tool} tool could not be used: {e}"))
        }
    }
}
