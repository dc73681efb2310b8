//! Test doubles for the backend and tool host.

use crate::gateway::{Backend, GatewayError};
use crate::tools::{ToolArguments, ToolDescriptor, ToolError, ToolHost};
use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

/// Backend that replays queued results and records every prompt.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    prompts: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedBackend {
    pub fn new(responses: impl IntoIterator<Item = Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn models(&self) -> Vec<Option<String>> {
        self.prompts.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }
}

impl Backend for ScriptedBackend {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, GatewayError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.map(String::from)));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::InvalidResponse("script exhausted".into())))
    }
}

/// In-memory tool host advertising a fixed catalog.
pub struct FakeToolHost {
    advertised: Vec<ToolDescriptor>,
    catalog: Vec<ToolDescriptor>,
    failure: Option<ToolError>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeToolHost {
    /// A bootstrapped host offering `wikipedia_summary`.
    pub fn wikipedia() -> Self {
        let advertised = vec![ToolDescriptor {
            name: "wikipedia_summary".into(),
            description: "Fetch a short summary of a Wikipedia article.".into(),
        }];
        Self {
            catalog: advertised.clone(),
            advertised,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every call fail with `error`.
    pub fn failing(mut self, error: ToolError) -> Self {
        self.failure = Some(error);
        self
    }

    /// `(tool, first argument)` for every call that reached the host.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolHost for FakeToolHost {
    async fn bootstrap(&mut self) -> Result<Vec<ToolDescriptor>, ToolError> {
        self.catalog = self.advertised.clone();
        Ok(self.catalog.clone())
    }

    fn catalog(&self) -> &[ToolDescriptor] {
        &self.catalog
    }

    async fn invoke(&self, name: &str, arguments: &ToolArguments) -> Result<String, ToolError> {
        if !self.has_tool(name) {
            return Err(ToolError::NotFound(name.to_string()));
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let topic = arguments.0.values().next().cloned().unwrap_or_default();
        self.calls.lock().unwrap().push((name.to_string(), topic.clone()));
        Ok(format!("**{topic}**\n\nSummary of {topic}."))
    }
}

/// Serve `/api/generate` on an ephemeral port, answering with `status`
/// after `delay`.
///
/// Bodies echo the requested model and the `stream` flag.
pub async fn spawn_generate_backend(status: StatusCode, delay: Duration) -> String {
    let app = Router::new().route(
        "/api/generate",
        post(move |Json(request): Json<Value>| async move {
            tokio::time::sleep(delay).await;
            let model = request["model"].as_str().unwrap_or_default().to_string();
            let stream = request["stream"].as_bool();
            (
                status,
                Json(json!({
                    "model": model,
                    "response": format!("model={model} stream={stream:?}"),
                    "done": true,
                })),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// In-process MCP tool host speaking newline-delimited JSON-RPC.
///
/// Offers `wikipedia_summary`. A call answers with two text blocks, or with
/// an error result when `topic` is empty.
pub struct StubToolServer {
    calls: Arc<AtomicUsize>,
}

impl StubToolServer {
    /// Start the server and return the client end of its stream.
    pub fn start() -> (DuplexStream, Self) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let calls = Arc::new(AtomicUsize::new(0));
        tokio::spawn(serve_stub(server, Arc::clone(&calls)));
        (client, Self { calls })
    }

    /// Number of `tools/call` requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn serve_stub(stream: DuplexStream, calls: Arc<AtomicUsize>) {
    let (read, mut write) = tokio::io::split(stream);
    let mut lines = BufReader::new(read).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(message) = serde_json::from_str::<Value>(&line) else {
            continue;
        };
        // Notifications carry no id; responses carry no method.
        let (Some(id), Some(method)) = (message.get("id"), message["method"].as_str()) else {
            continue;
        };

        let outcome = match method {
            "initialize" => Ok(json!({
                "protocolVersion": message["params"]["protocolVersion"],
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "stub-tool-host", "version": "0.1.0" },
            })),
            "tools/list" => Ok(json!({
                "tools": [{
                    "name": "wikipedia_summary",
                    "description": "Fetch a short summary of a Wikipedia article.",
                    "inputSchema": {
                        "type": "object",
                        "properties": { "topic": { "type": "string" } },
                        "required": ["topic"],
                    },
                }],
            })),
            "tools/call" => {
                calls.fetch_add(1, Ordering::SeqCst);
                let topic = message["params"]["arguments"]["topic"]
                    .as_str()
                    .unwrap_or_default();
                if topic.is_empty() {
                    Ok(json!({
                        "content": [{ "type": "text", "text": "topic must not be empty" }],
                        "isError": true,
                    }))
                } else {
                    Ok(json!({
                        "content": [
                            { "type": "text", "text": format!("**{topic}**\n\nSummary of {topic}.") },
                            { "type": "text", "text": "Source: Wikipedia" },
                        ],
                        "isError": false,
                    }))
                }
            }
            other => Err(json!({ "code": -32601, "message": format!("method not found: {other}") })),
        };

        let response = match outcome {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(error) => json!({ "jsonrpc": "2.0", "id": id, "error": error }),
        };
        let mut frame = response.to_string();
        frame.push('\n');
        if write.write_all(frame.as_bytes()).await.is_err() {
            break;
        }
    }
}
