//! Ollama generate API backend.

use super::{Backend, GatewayError, ModelEndpoint};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on a single generate call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Builder for creating an Ollama backend.
#[derive(Debug, Clone)]
pub struct OllamaBackendBuilder {
    models: Vec<ModelEndpoint>,
    default_model: ModelEndpoint,
    timeout: Duration,
}

impl OllamaBackendBuilder {
    /// Create a builder whose default model is `default_model`.
    pub fn new(default_model: ModelEndpoint) -> Self {
        Self {
            models: Vec::new(),
            default_model,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Register further models that may be requested by name.
    pub fn models(mut self, models: impl IntoIterator<Item = ModelEndpoint>) -> Self {
        self.models.extend(models);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> OllamaBackend {
        OllamaBackend {
            client: reqwest::Client::new(),
            default_model: self.default_model,
            models: self.models,
            timeout: self.timeout,
        }
    }
}

/// Backend for an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaBackend {
    client: reqwest::Client,
    default_model: ModelEndpoint,
    models: Vec<ModelEndpoint>,
    timeout: Duration,
}

impl OllamaBackend {
    pub fn builder(default_model: ModelEndpoint) -> OllamaBackendBuilder {
        OllamaBackendBuilder::new(default_model)
    }

    /// Build from an ordered model list; the first entry is the default.
    ///
    /// Returns `None` for an empty list.
    pub fn from_models(models: &[ModelEndpoint]) -> Option<OllamaBackendBuilder> {
        let (first, rest) = models.split_first()?;
        Some(OllamaBackendBuilder::new(first.clone()).models(rest.iter().cloned()))
    }

    /// Endpoint serving `model`; unknown names go to the default endpoint.
    fn endpoint_for(&self, model: &str) -> &str {
        std::iter::once(&self.default_model)
            .chain(&self.models)
            .find(|m| m.name == model)
            .map_or(self.default_model.endpoint.as_str(), |m| m.endpoint.as_str())
    }

    fn generate_url(endpoint: &str) -> String {
        format!("{}/api/generate", endpoint.trim_end_matches('/'))
    }
}

impl Backend for OllamaBackend {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, GatewayError> {
        let model = model.unwrap_or(&self.default_model.name);
        let url = Self::generate_url(self.endpoint_for(model));

        info!(model, url = url.as_str(), prompt_len = prompt.len(), "sending generate request");

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        secs: self.timeout.as_secs(),
                    }
                } else {
                    GatewayError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(model, status = status.as_u16(), "generation backend error");
            return Err(GatewayError::Status {
                code: status.as_u16(),
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout {
                    secs: self.timeout.as_secs(),
                }
            } else {
                GatewayError::InvalidResponse(e.to_string())
            }
        })?;

        debug!(model, response_len = body.response.len(), "received generation");
        Ok(body.response)
    }
}
