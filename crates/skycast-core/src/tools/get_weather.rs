//! The `get_weather` tool: schema and argument decoding.
//!
//! Models emit arguments as a JSON string. Decoding fails closed: anything
//! that cannot be read yields an empty city and the `current` mode, and the
//! weather client answers that with its own not-found text.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::llm::ToolMetadata;
use crate::weather::WeatherMode;

pub const WEATHER_TOOL_NAME: &str = "get_weather";

pub fn metadata() -> ToolMetadata {
    ToolMetadata {
        name: WEATHER_TOOL_NAME.to_string(),
        description: "Get weather information for a city, current or forecast".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name"
                },
                "type": {
                    "type": "string",
                    "enum": ["current", "forecast"],
                    "description": "Type of weather data to retrieve",
                    "default": "current"
                }
            },
            "required": ["city"]
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetWeatherArgs {
    pub city: String,
    pub mode: WeatherMode,
}

#[derive(Deserialize)]
struct RawArgs {
    #[serde(default)]
    city: Option<Value>,
    #[serde(rename = "type", default)]
    kind: Option<Value>,
}

impl GetWeatherArgs {
    pub fn decode(arguments: &str) -> Self {
        let raw = match serde_json::from_str::<RawArgs>(arguments) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not decode get_weather arguments {:?}: {}", arguments, e);
                return Self {
                    city: String::new(),
                    mode: WeatherMode::Current,
                };
            }
        };

        let city = raw
            .city
            .as_ref()
            .and_then(Value::as_str)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        let mode = raw
            .kind
            .as_ref()
            .and_then(Value::as_str)
            .map(WeatherMode::from_arg)
            .unwrap_or(WeatherMode::Current);

        Self { city, mode }
    }

    /// The city to remember as the conversation's last city, if any.
    pub fn effective_city(&self) -> Option<&str> {
        if self.city.is_empty() {
            None
        } else {
            Some(&self.city)
        }
    }
}
