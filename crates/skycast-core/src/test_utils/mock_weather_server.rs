// src/test_utils/mock_weather_server.rs
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Canned reply for one provider route.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub body: Value,
}

impl MockReply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: serde_json::json!({
                "cod": status.as_u16().to_string(),
                "message": "mock failure"
            }),
        }
    }
}

#[derive(Clone)]
struct WeatherState {
    current: MockReply,
    forecast: MockReply,
    queries: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
}

async fn reply(
    state: &WeatherState,
    route: &str,
    params: HashMap<String, String>,
    canned: &MockReply,
) -> (StatusCode, Json<Value>) {
    state.queries.lock().unwrap().push((route.to_string(), params));
    (canned.status, Json(canned.body.clone()))
}

async fn current_handler(
    State(state): State<WeatherState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let canned = state.current.clone();
    reply(&state, "weather", params, &canned).await
}

async fn forecast_handler(
    State(state): State<WeatherState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let canned = state.forecast.clone();
    reply(&state, "forecast", params, &canned).await
}

pub struct MockWeatherServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    queries: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
}

impl MockWeatherServer {
    pub async fn start(current: MockReply, forecast: MockReply) -> Self {
        let state = WeatherState {
            current,
            forecast,
            queries: Arc::new(Mutex::new(Vec::new())),
        };
        let queries = state.queries.clone();

        let app = Router::new()
            .route("/data/2.5/weather", get(current_handler))
            .route("/data/2.5/forecast", get(forecast_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock weather server");
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| log::error!("Mock weather server error: {}", e));
        });

        Self {
            addr,
            shutdown_tx,
            queries,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Route name ("weather" or "forecast") and query parameters of every request.
    pub fn queries(&self) -> Vec<(String, HashMap<String, String>)> {
        self.queries.lock().unwrap().clone()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }
}
