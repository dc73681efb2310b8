//! Tool catalog client and dispatch.

mod dispatch;
pub mod errors;
mod host;
mod mcp_host;
mod types;

pub use dispatch::dispatch;
pub use errors::ToolError;
pub use host::ToolHost;
pub use mcp_host::McpToolHost;
pub use types::{ToolArguments, ToolDescriptor, ToolInvocationResult};
