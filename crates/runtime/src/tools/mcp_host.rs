//! MCP-backed tool host.
//!
//! Spawns the tool host as a child process and talks to it over stdio using
//! the rmcp SDK.
//!
//! # Example
//!
//! ```ignore
//! use runtime::{McpToolHost, ToolArguments, ToolHost};
//!
//! # async fn example() -> Result<(), runtime::ToolError> {
//! let mut host = McpToolHost::spawn("python", ["server.py"]).await?;
//! for tool in host.bootstrap().await? {
//!     println!("{}: {}", tool.name, tool.description);
//! }
//! let text = host
//!     .invoke("wikipedia_summary", &ToolArguments::single("topic", "Rust"))
//!     .await?;
//! host.shutdown().await;
//! # Ok(())
//! # }
//! ```

use super::{ToolArguments, ToolDescriptor, ToolError, ToolHost};
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, CallToolResult},
    service::{RoleClient, RunningService},
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Tool host backed by an MCP server process.
///
/// The session lives as long as this value; dropping it cancels the
/// session and closes the child's stdio.
pub struct McpToolHost {
    service: RunningService<RoleClient, ()>,
    catalog: Vec<ToolDescriptor>,
}

impl McpToolHost {
    /// Spawn the tool host and complete the initialize handshake.
    ///
    /// The catalog is empty until [`ToolHost::bootstrap`] is called.
    pub async fn spawn(
        command: impl AsRef<str>,
        args: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, ToolError> {
        let command = command.as_ref().to_string();
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        info!(command = command.as_str(), ?args, "spawning tool host");

        let transport = TokioChildProcess::new(Command::new(&command).configure(|cmd| {
            for arg in &args {
                cmd.arg(arg);
            }
        }))
        .map_err(|e| ToolError::Transport(format!("failed to spawn {command}: {e}")))?;

        let service = ()
            .serve(transport)
            .await
            .map_err(|e| ToolError::Transport(format!("handshake with {command} failed: {e}")))?;

        Ok(Self::from_service(service))
    }

    /// Complete the handshake with a tool host already reachable over `stream`.
    pub async fn connect<S>(stream: S) -> Result<Self, ToolError>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let service = ()
            .serve(stream)
            .await
            .map_err(|e| ToolError::Transport(format!("handshake failed: {e}")))?;

        Ok(Self::from_service(service))
    }

    fn from_service(service: RunningService<RoleClient, ()>) -> Self {
        Self {
            service,
            catalog: Vec::new(),
        }
    }

    /// Cancel the session and wait for the transport to close.
    pub async fn shutdown(self) {
        match self.service.cancel().await {
            Ok(reason) => debug!(?reason, "tool host session closed"),
            Err(e) => warn!(error = %e, "tool host session did not close cleanly"),
        }
    }
}

impl ToolHost for McpToolHost {
    async fn bootstrap(&mut self) -> Result<Vec<ToolDescriptor>, ToolError> {
        let response = self
            .service
            .list_tools(Default::default())
            .await
            .map_err(|e| ToolError::Transport(format!("list tools: {e}")))?;

        self.catalog = response.tools.into_iter().map(ToolDescriptor::from).collect();
        info!(tools = self.catalog.len(), "tool catalog loaded");
        Ok(self.catalog.clone())
    }

    fn catalog(&self) -> &[ToolDescriptor] {
        &self.catalog
    }

    async fn invoke(&self, name: &str, arguments: &ToolArguments) -> Result<String, ToolError> {
        // The host is authoritative, but never send it a name we were not given.
        if !self.has_tool(name) {
            return Err(ToolError::NotFound(name.to_string()));
        }

        let params = CallToolRequestParams {
            name: name.to_string().into(),
            arguments: Some(arguments.to_json()),
            meta: None,
            task: None,
        };

        debug!(tool = name, "calling tool");
        let result = self
            .service
            .call_tool(params)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        text_output(&result)
    }
}

/// Read the first text block of a call result.
fn text_output(result: &CallToolResult) -> Result<String, ToolError> {
    let text = result
        .content
        .iter()
        .find_map(|content| content.as_text().map(|t| t.text.clone()));

    match (text, result.is_error.unwrap_or(false)) {
        (Some(text), false) => Ok(text),
        (Some(text), true) => Err(ToolError::Execution(text)),
        (None, true) => Err(ToolError::Execution("tool reported an error".into())),
        (None, false) => Err(ToolError::Execution("tool returned no text content".into())),
    }
}
