//! Weather lookups for the `get_weather` tool and the snapshot endpoint.
//!
//! Tool lookups never fail: every provider or transport problem becomes a
//! sentence the model can read and relay. Structured snapshots are the one
//! exception and report failures so the HTTP layer can tell callers apart
//! from an unavailable upstream.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ChatError;

pub mod forecast;
pub mod openweather;

pub use openweather::OpenWeatherClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherMode {
    #[default]
    Current,
    Forecast,
}

impl WeatherMode {
    /// Reads the tool's `type` argument. Anything but `forecast` is a current lookup.
    pub fn from_arg(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("forecast") {
            WeatherMode::Forecast
        } else {
            WeatherMode::Current
        }
    }
}

/// Current conditions for one city, as returned by the snapshot endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: f64,
    pub humidity: i64,
    pub wind_speed: f64,
    pub condition: String,
}

#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Human-readable weather text for the tool result. Never fails.
    async fn fetch(&self, city: &str, mode: WeatherMode) -> String;

    async fn snapshot(&self, city: &str) -> Result<WeatherSnapshot, ChatError>;
}

pub fn not_found_message(city: &str, mode: WeatherMode) -> String {
    match mode {
        WeatherMode::Current => format!(
            "Could not get weather for \"{}\". Please try another city.",
            city
        ),
        WeatherMode::Forecast => format!("Could not get forecast for \"{}\".", city),
    }
}

pub fn lookup_error_message(city: &str) -> String {
    format!("Error looking up weather for \"{}\".", city)
}
