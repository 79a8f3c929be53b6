// src/test_utils/mock_llm_server.rs
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::core_types::LLMResponse;
use crate::errors::ChatError;

/// One request as the mock endpoint received it.
#[derive(Debug, Clone)]
pub struct RecordedCompletionRequest {
    pub body: Value,
    pub authorization: Option<String>,
    pub referer: Option<String>,
    pub title: Option<String>,
}

#[derive(Clone)]
struct MockServerState {
    responses: Arc<Mutex<VecDeque<Result<LLMResponse, ChatError>>>>,
    requests: Arc<Mutex<Vec<RecordedCompletionRequest>>>,
}

impl MockServerState {
    fn new(responses: Vec<Result<LLMResponse, ChatError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Renders a scripted response in the chat-completions wire format.
pub fn to_completion_json(resp: &LLMResponse) -> Value {
    let mut message = json!({
        "role": "assistant",
        "content": resp.content,
    });
    if let Some(calls) = &resp.tool_calls {
        message["tool_calls"] = calls
            .iter()
            .map(|c| {
                json!({
                    "id": c.id,
                    "type": "function",
                    "function": {"name": c.name, "arguments": c.arguments}
                })
            })
            .collect::<Vec<_>>()
            .into();
    }
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": message,
            "finish_reason": resp.finish_reason.clone().unwrap_or_else(|| "stop".to_string())
        }]
    })
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

async fn chat_completions_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    log::debug!("Mock LLM server received request: {}", body);
    state.requests.lock().unwrap().push(RecordedCompletionRequest {
        body,
        authorization: header(&headers, "authorization"),
        referer: header(&headers, "http-referer"),
        title: header(&headers, "x-title"),
    });

    match state.responses.lock().unwrap().pop_front() {
        Some(Ok(resp)) => Ok(Json(to_completion_json(&resp))),
        Some(Err(e)) => {
            log::error!("Mock LLM server simulating an error: {:?}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        None => {
            log::error!("Mock LLM server ran out of responses!");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

pub struct MockLLMServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    pub recorded_requests: Arc<Mutex<Vec<RecordedCompletionRequest>>>,
}

impl MockLLMServer {
    pub async fn start(responses: Vec<Result<LLMResponse, ChatError>>) -> Self {
        let state = MockServerState::new(responses);
        let recorded_requests_clone = state.requests.clone();

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock server to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock LLM server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("Mock LLM server error: {}", e);
                });
        });

        MockLLMServer {
            addr,
            shutdown_tx,
            recorded_requests: recorded_requests_clone,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock LLM server shutdown signal already sent or receiver dropped.");
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    pub fn get_requests(&self) -> Vec<RecordedCompletionRequest> {
        self.recorded_requests.lock().unwrap().clone()
    }
}
