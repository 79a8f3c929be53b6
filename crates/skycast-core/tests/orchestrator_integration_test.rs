use async_trait::async_trait;
use axum::{extract::Query, routing::get, Json, Router};
use serde_json::{json, Value};
use skycast_core::core_types::{LLMResponse, Message, Role, ToolCall};
use skycast_core::errors::ChatError;
use skycast_core::llm::{ToolMetadata, LLM};
use skycast_core::orchestrator::FALLBACK_REPLY;
use skycast_core::{ChatOrchestrator, ChatRequest, OpenWeatherClient, Turn, TurnKind};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone)]
struct MockLLM {
    responses: Arc<Mutex<Vec<LLMResponse>>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockLLM {
    fn new(responses: Vec<LLMResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LLM for MockLLM {
    async fn generate(
        &self,
        messages: Vec<Message>,
        _tools: Option<Vec<ToolMetadata>>,
    ) -> Result<LLMResponse, ChatError> {
        self.seen.lock().unwrap().push(messages);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ChatError::LLMError("no scripted response left".to_string()));
        }
        Ok(responses.remove(0))
    }
}

fn answer(text: &str) -> LLMResponse {
    LLMResponse {
        content: Some(text.to_string()),
        tool_calls: None,
        finish_reason: Some("stop".to_string()),
        usage: None,
    }
}

fn weather_call(id: &str, arguments: &str) -> LLMResponse {
    LLMResponse {
        content: None,
        tool_calls: Some(vec![ToolCall {
            id: id.to_string(),
            name: "get_weather".to_string(),
            arguments: arguments.to_string(),
        }]),
        finish_reason: Some("tool_calls".to_string()),
        usage: None,
    }
}

async fn current(
    Query(params): Query<HashMap<String, String>>,
) -> (axum::http::StatusCode, Json<Value>) {
    let city = params.get("q").cloned().unwrap_or_default();
    if city.eq_ignore_ascii_case("atlantis") {
        return (
            axum::http::StatusCode::NOT_FOUND,
            Json(json!({"cod": "404", "message": "city not found"})),
        );
    }
    (
        axum::http::StatusCode::OK,
        Json(json!({
            "name": city,
            "main": {"temp": 9.5, "feels_like": 7.0, "humidity": 81},
            "weather": [{"description": "broken clouds"}],
            "wind": {"speed": 6.2}
        })),
    )
}

async fn forecast(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let city = params.get("q").cloned().unwrap_or_default();
    Json(json!({
        "city": {"name": city},
        "list": [
            {"dt_txt": "2024-03-10 12:00:00", "main": {"temp": 8.0, "feels_like": 6.0}, "weather": [{"description": "drizzle"}], "wind": {"speed": 4.0}},
            {"dt_txt": "2024-03-11 12:00:00", "main": {"temp": 10.0, "feels_like": 9.0}, "weather": [{"description": "sunny"}], "wind": {"speed": 2.0}}
        ]
    }))
}

async fn start_provider() -> String {
    let app = Router::new()
        .route("/data/2.5/weather", get(current))
        .route("/data/2.5/forecast", get(forecast));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn orchestrator(llm: Arc<MockLLM>, provider: String) -> ChatOrchestrator {
    let weather = Arc::new(OpenWeatherClient::new("test-key".to_string()).with_api_base(provider));
    ChatOrchestrator::new(llm, weather)
}

#[tokio::test]
async fn test_weather_question_end_to_end() {
    let provider = start_provider().await;
    let llm = Arc::new(MockLLM::new(vec![
        weather_call("call_1", r#"{"city":"Dublin"}"#),
        answer("It's 9.5°C with broken clouds in Dublin."),
    ]));
    let orchestrator = orchestrator(llm.clone(), provider);

    let outcome = orchestrator
        .chat(ChatRequest {
            message: "What's the weather in Dublin?".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome.reply, "It's 9.5°C with broken clouds in Dublin.");
    assert_eq!(outcome.last_city.as_deref(), Some("Dublin"));

    let seen = llm.seen.lock().unwrap();
    let tool_message = seen[1].last().unwrap();
    assert_eq!(tool_message.role, Role::Tool);
    assert!(tool_message.content.starts_with("Current weather in Dublin:"));
    assert!(tool_message.content.contains("broken clouds"));
}

#[tokio::test]
async fn test_follow_up_turn_reuses_returned_state() {
    let provider = start_provider().await;
    let llm = Arc::new(MockLLM::new(vec![
        weather_call("call_1", r#"{"city":"Galway"}"#),
        answer("Galway is mild today."),
        weather_call("call_2", r#"{"city":"Galway","type":"forecast"}"#),
        answer("Drizzle then sun."),
    ]));
    let orchestrator = orchestrator(llm.clone(), provider);

    let first = orchestrator
        .chat(ChatRequest {
            message: "Weather in Galway?".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let second = orchestrator
        .chat(ChatRequest {
            message: "And the next few days?".to_string(),
            history: first.history.clone(),
            last_city: first.last_city.clone(),
        })
        .await
        .unwrap();

    assert_eq!(second.reply, "Drizzle then sun.");
    assert_eq!(second.history.len(), 4);
    assert_eq!(second.history[0].kind, TurnKind::Human);
    assert_eq!(second.history[3], Turn::ai("Drizzle then sun."));

    let seen = llm.seen.lock().unwrap();
    // third completion call opens the second turn: system + 2 prior turns + new user message
    assert_eq!(seen[2].len(), 4);
    assert_eq!(seen[2][2].content, "Galway is mild today.");
    let forecast_result = seen[3].last().unwrap();
    assert!(forecast_result.content.contains("5-Day Forecast for **Galway**"));
    assert!(forecast_result.content.contains("📅 2024-03-11"));
}

#[tokio::test]
async fn test_unknown_city_is_relayed_to_the_model() {
    let provider = start_provider().await;
    let llm = Arc::new(MockLLM::new(vec![
        weather_call("call_1", r#"{"city":"Atlantis"}"#),
        answer("I couldn't find Atlantis."),
    ]));
    let orchestrator = orchestrator(llm.clone(), provider);

    let outcome = orchestrator
        .chat(ChatRequest {
            message: "Weather in Atlantis".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome.reply, "I couldn't find Atlantis.");
    let seen = llm.seen.lock().unwrap();
    assert_eq!(
        seen[1].last().unwrap().content,
        "Could not get weather for \"Atlantis\". Please try another city."
    );
}

#[tokio::test]
async fn test_endless_tool_requests_fall_back() {
    let provider = start_provider().await;
    let script = (0..10)
        .map(|i| weather_call(&format!("call_{}", i), r#"{"city":"Cork"}"#))
        .collect();
    let llm = Arc::new(MockLLM::new(script));
    let orchestrator = orchestrator(llm.clone(), provider);

    let outcome = orchestrator
        .chat(ChatRequest {
            message: "weather in cork".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome.reply, FALLBACK_REPLY);
    assert_eq!(llm.seen.lock().unwrap().len(), 5);
}
