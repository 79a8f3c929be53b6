//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};
use skycast_core::{ChatOutcome, ChatRequest, Turn};

/// Body of `POST /api/chat`. A missing `history` is an empty conversation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequestBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<Turn>,
    #[serde(default, rename = "lastCity")]
    pub last_city: Option<String>,
}

impl From<ChatRequestBody> for ChatRequest {
    fn from(body: ChatRequestBody) -> Self {
        ChatRequest {
            message: body.message,
            history: body.history,
            last_city: body.last_city,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub reply: String,
    pub history: Vec<Turn>,
    #[serde(rename = "lastCity")]
    pub last_city: Option<String>,
}

impl From<ChatOutcome> for ChatResponseBody {
    fn from(outcome: ChatOutcome) -> Self {
        Self {
            reply: outcome.reply,
            history: outcome.history,
            last_city: outcome.last_city,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}
