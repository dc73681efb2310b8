//! Configuration loading from `toolchat.toml` or `config.json`.

use runtime::{DirectiveSet, DirectiveTool, ModelEndpoint};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Script or binary the tool host runs.
    pub entrypoint: String,

    /// Interpreter used to launch the entrypoint. Empty runs it directly.
    #[serde(default = "default_launcher")]
    pub launcher: String,

    /// Extra arguments passed after the entrypoint.
    #[serde(default)]
    pub args: Vec<String>,

    /// Generation models; the first is the default.
    #[serde(default)]
    pub models: Vec<ModelEndpoint>,

    /// Number of turns included in each prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Upper bound on one generation request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tools the backend may request with a directive.
    #[serde(default = "default_directives")]
    pub directives: Vec<DirectiveConfig>,
}

/// A tool name and the parameter its argument is passed under.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectiveConfig {
    pub tool: String,
    pub parameter: String,
}

fn default_launcher() -> String {
    "python".to_string()
}

fn default_history_window() -> usize {
    runtime::history::DEFAULT_WINDOW
}

fn default_request_timeout_secs() -> u64 {
    runtime::gateway::DEFAULT_TIMEOUT.as_secs()
}

fn default_directives() -> Vec<DirectiveConfig> {
    DirectiveSet::default()
        .tools()
        .iter()
        .map(|t| DirectiveConfig {
            tool: t.name.clone(),
            parameter: t.parameter.clone(),
        })
        .collect()
}

impl Config {
    /// Load configuration, choosing the format by file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::parse_json(&content),
            _ => Self::parse(&content),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(toml)
            .map_err(|e| ConfigError::Parse(e.to_string()))?
            .validate()
    }

    /// Parse configuration from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(json)
            .map_err(|e| ConfigError::Parse(e.to_string()))?
            .validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::NoModels);
        }
        if self.entrypoint.trim().is_empty() {
            return Err(ConfigError::MissingEntrypoint);
        }
        if self.history_window == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        Ok(self)
    }

    /// The default model record.
    pub fn default_model(&self) -> &ModelEndpoint {
        &self.models[0]
    }

    /// Command and arguments that start the tool host.
    pub fn tool_host_command(&self) -> (String, Vec<String>) {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        if self.launcher.is_empty() {
            args.extend(self.args.iter().cloned());
            (self.entrypoint.clone(), args)
        } else {
            args.push(self.entrypoint.clone());
            args.extend(self.args.iter().cloned());
            (self.launcher.clone(), args)
        }
    }

    pub fn directive_set(&self) -> DirectiveSet {
        DirectiveSet::new(
            self.directives
                .iter()
                .map(|d| DirectiveTool::new(&d.tool, &d.parameter))
                .collect(),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("no models configured: add at least one [[models]] entry")]
    NoModels,

    #[error("entrypoint must name the tool host to launch")]
    MissingEntrypoint,

    #[error("history_window must be at least 1")]
    InvalidWindow,
}
