//! Toolchat runtime: a tool-augmented conversation loop.
//!
//! This crate drives a conversation between a user, a text-generation
//! backend, and a catalog of tools served by an MCP tool host. Each turn the
//! backend's output is either taken as the answer or, when it contains a
//! `TOOL_CALL:` directive, used to invoke a tool whose result is folded back
//! into a second generation.
//!
//! # Overview
//!
//! - **ToolHost**: the tool catalog client; [`McpToolHost`] spawns the host
//!   process and holds one session for the process lifetime.
//! - **Backend**: a stateless prompt-to-text adapter; [`OllamaBackend`] talks
//!   to an Ollama-compatible `/api/generate` endpoint.
//! - **DirectiveSet**: the directive grammar and the tools it may name.
//! - **History**: append-only turns with a windowed view for prompts.
//! - **Session**: the per-turn orchestration; [`console::run`] wraps it in a
//!   line-oriented loop.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{McpToolHost, ModelEndpoint, OllamaBackend, Session, ToolHost};
//!
//! # async fn example() -> runtime::Result<()> {
//! let mut tools = McpToolHost::spawn("python", ["server.py"]).await?;
//! tools.bootstrap().await?;
//!
//! let backend =
//!     OllamaBackend::builder(ModelEndpoint::new("llama3.2", "http://localhost:11434")).build();
//! let mut session = Session::new(backend, tools);
//! let reply = session.chat("Tell me about Marie Curie").await;
//! println!("{}", reply.text());
//! # Ok(())
//! # }
//! ```

pub mod console;
pub mod directive;
mod error;
pub mod gateway;
pub mod history;
pub mod prompt;
mod session;
pub mod tools;

#[cfg(test)]
mod testing;

pub use directive::{DirectiveParseError, DirectiveSet, DirectiveTool, ToolDirective};
pub use error::{Error, Result};
pub use gateway::{Backend, GatewayError, ModelEndpoint, OllamaBackend};
pub use history::{History, Role, Turn};
pub use session::{Reply, Session, ToolExchange};
pub use tools::{
    McpToolHost, ToolArguments, ToolDescriptor, ToolError, ToolHost, ToolInvocationResult,
};
