//! Configuration type definitions for the chat service
//!
//! The service is configured once at process start. Every value except the two
//! API keys has a default matching the hosted deployment (OpenRouter for
//! completions, OpenWeatherMap for weather, metric units).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ChatError;

pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub weather: WeatherSettings,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    #[serde(default = "default_openrouter_url")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    /// Sent as `HTTP-Referer` so OpenRouter can attribute traffic.
    #[serde(default = "default_app_url")]
    pub app_url: String,
    /// Sent as `X-Title`.
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    pub api_key: String,
    #[serde(default = "default_openweather_url")]
    pub api_base: String,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

impl LlmSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: default_openrouter_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout(),
            app_url: default_app_url(),
            app_title: default_app_title(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WeatherSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: default_openweather_url(),
            units: default_units(),
            timeout_secs: default_weather_timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.llm.api_key.trim().is_empty() {
            return Err(ChatError::ConfigError("LLM API key must not be empty".to_string()));
        }
        if self.weather.api_key.trim().is_empty() {
            return Err(ChatError::ConfigError(
                "Weather API key must not be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ChatError::ConfigError("Port must be non-zero".to_string()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ChatError::ConfigError("LLM model must not be empty".to_string()));
        }
        if self.llm.timeout_secs == 0 || self.weather.timeout_secs == 0 {
            return Err(ChatError::ConfigError("Timeouts must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn default_port() -> u16 {
    3000
}

fn default_openrouter_url() -> String {
    DEFAULT_OPENROUTER_URL.to_string()
}

fn default_openweather_url() -> String {
    DEFAULT_OPENWEATHER_URL.to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.4
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_weather_timeout() -> u64 {
    10
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_app_title() -> String {
    "Weather Chatbot".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}
