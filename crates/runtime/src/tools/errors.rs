use thiserror::Error;

/// Errors from the tool host session or a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The tool host could not be reached or the handshake failed.
    #[error("tool host transport: {0}")]
    Transport(String),
    /// The requested tool is not in the catalog.
    #[error("tool not found: {0}")]
    NotFound(String),
    /// The host reported a failure while running the tool.
    #[error("execution failed: {0}")]
    Execution(String),
}
