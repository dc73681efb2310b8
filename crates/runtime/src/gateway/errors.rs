use thiserror::Error;

/// Errors from a generation backend call.
///
/// None of these end the conversation; the loop shows them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The backend answered with a non-success status.
    #[error("generation backend returned status {code}")]
    Status { code: u16 },

    /// No answer arrived within the request timeout.
    #[error("generation backend timed out after {secs}s")]
    Timeout { secs: u64 },

    /// A network error occurred during the call.
    #[error("network: {0}")]
    Network(String),

    /// The response body could not be parsed.
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// HTTP status code, when the backend produced one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Status { code } => Some(*code),
            _ => None,
        }
    }
}
