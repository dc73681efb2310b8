//! Generation backend abstraction.
//!
//! A backend turns a prompt into generated text. Calls are single-shot:
//! no retries, no streaming.

mod errors;
mod ollama;

pub use errors::GatewayError;
pub use ollama::{DEFAULT_TIMEOUT, OllamaBackend, OllamaBackendBuilder};

use serde::{Deserialize, Serialize};
use std::future::Future;

/// A model name and the endpoint that serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEndpoint {
    pub name: String,
    pub endpoint: String,
}

impl ModelEndpoint {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Trait for text-generation backends.
pub trait Backend: Send + Sync {
    /// Generate text for `prompt`, using the default model when `model` is `None`.
    fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}
