//! Test utilities for homeplan-core
//!
//! Provides a mock language-model server speaking both the OpenAI chat
//! completions API and the Ollama generate API, for unit and integration
//! tests of the narrative backends.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Narrative JSON returned in `MockMode::Valid`
pub const MOCK_NARRATIVE_JSON: &str = r#"{"summary":"Mock healthy home plan.","priority_steps":["Swap laundry detergent","Swap dish soap"],"categories":[{"name":"Laundry","reason":"Fragrance exposure","recommendations":["Laundry Detergent"]}]}"#;

/// How the mock server answers generation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Well-formed narrative JSON
    Valid,
    /// 200 OK with text that contains no JSON object
    Garbage,
    /// HTTP 500 on every generation request
    ServerError,
    /// Valid JSON, but only after a long delay
    Slow,
}

struct MockState {
    mode: MockMode,
    requests: Mutex<Vec<Value>>,
}

/// Mock LLM server for tests
pub struct MockLlmServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server on an available port
    pub async fn start(mode: MockMode) -> Self {
        let state = Arc::new(MockState {
            mode,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request bodies received by the generation endpoints, in order
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model"}]
    }))
}

async fn handle_tags() -> Json<Value> {
    Json(json!({
        "models": [{"name": "llama3.2:latest", "size": 4_000_000_000u64}]
    }))
}

async fn handle_chat(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let model = body["model"].as_str().unwrap_or("mock-model").to_string();
    state.requests.lock().unwrap().push(body);

    match generated_text(&state).await {
        Ok(text) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        Err(status) => (status, "mock failure").into_response(),
    }
}

async fn handle_generate(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let model = body["model"].as_str().unwrap_or("llama3.2").to_string();
    state.requests.lock().unwrap().push(body);

    match generated_text(&state).await {
        Ok(text) => Json(json!({
            "model": model,
            "response": text,
            "done": true
        }))
        .into_response(),
        Err(status) => (status, "mock failure").into_response(),
    }
}

async fn generated_text(state: &MockState) -> Result<String, StatusCode> {
    match state.mode {
        MockMode::Valid => Ok(MOCK_NARRATIVE_JSON.to_string()),
        MockMode::Garbage => Ok("I'm sorry, I can't produce that plan right now.".to_string()),
        MockMode::ServerError => Err(StatusCode::INTERNAL_SERVER_ERROR),
        MockMode::Slow => {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(MOCK_NARRATIVE_JSON.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let server = MockLlmServer::start(MockMode::Valid).await;
        assert!(server.url().starts_with("http://127.0.0.1:"));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_mock_server_health_endpoints() {
        let server = MockLlmServer::start(MockMode::ServerError).await;
        let client = reqwest::Client::new();

        let models = client
            .get(format!("{}/v1/models", server.url()))
            .send()
            .await
            .unwrap();
        assert!(models.status().is_success());

        let tags = client
            .get(format!("{}/api/tags", server.url()))
            .send()
            .await
            .unwrap();
        assert!(tags.status().is_success());
    }
}
