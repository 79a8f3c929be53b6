//! OpenWeatherMap implementation of [`WeatherLookup`].

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::config::WeatherSettings;
use crate::errors::ChatError;
use crate::weather::forecast::{render_current, render_forecast, CurrentPayload, ForecastPayload};
use crate::weather::{
    lookup_error_message, not_found_message, WeatherLookup, WeatherMode, WeatherSnapshot,
};

/// Why a provider request did not produce a usable payload.
#[derive(Debug)]
enum LookupFailure {
    /// The provider answered but not with data for this city.
    NotFound(String),
    /// Transport error, timeout or a payload of unexpected shape.
    Failed(String),
}

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    api_base: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Self::build_http_client(Duration::from_secs(10)),
            api_key,
            api_base: crate::config::DEFAULT_OPENWEATHER_URL.to_string(),
            units: "metric".to_string(),
        }
    }

    pub fn from_settings(settings: &WeatherSettings) -> Self {
        Self::new(settings.api_key.clone())
            .with_api_base(settings.api_base.clone())
            .with_units(settings.units.clone())
            .with_timeout(settings.timeout())
    }

    fn build_http_client(timeout: Duration) -> Client {
        Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new())
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_units(mut self, units: String) -> Self {
        self.units = units;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::build_http_client(timeout);
        self
    }

    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, LookupFailure> {
        let url = format!("{}/data/2.5/{}", self.api_base, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LookupFailure::Failed(format!("request to {} failed: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupFailure::NotFound(format!(
                "{} returned status {}",
                endpoint, status
            )));
        }

        let text = response.text().await.map_err(|e| {
            LookupFailure::Failed(format!("reading {} body failed: {}", endpoint, e))
        })?;
        let raw: Value = serde_json::from_str(&text).map_err(|e| {
            LookupFailure::NotFound(format!("{} body is not JSON: {}", endpoint, e))
        })?;
        serde_json::from_value(raw).map_err(|e| {
            LookupFailure::Failed(format!("unexpected {} payload: {}", endpoint, e))
        })
    }

    async fn current(&self, city: &str) -> Result<CurrentPayload, LookupFailure> {
        self.request("weather", city).await
    }

    async fn forecast(&self, city: &str) -> Result<ForecastPayload, LookupFailure> {
        self.request("forecast", city).await
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn fetch(&self, city: &str, mode: WeatherMode) -> String {
        let city = city.trim();
        if city.is_empty() {
            log::info!("Weather lookup without a city, skipping provider call");
            return not_found_message(city, mode);
        }

        log::info!("Weather lookup: city={}, mode={:?}", city, mode);
        let outcome = match mode {
            WeatherMode::Current => self.current(city).await.map(|p| render_current(&p)),
            WeatherMode::Forecast => self.forecast(city).await.map(|p| render_forecast(&p)),
        };

        match outcome {
            Ok(text) => text,
            Err(LookupFailure::NotFound(reason)) => {
                log::info!("Weather lookup for {:?} found nothing: {}", city, reason);
                not_found_message(city, mode)
            }
            Err(LookupFailure::Failed(reason)) => {
                log::warn!("Weather tool error for {:?}: {}", city, reason);
                lookup_error_message(city)
            }
        }
    }

    async fn snapshot(&self, city: &str) -> Result<WeatherSnapshot, ChatError> {
        let payload = self.current(city.trim()).await.map_err(|failure| match failure {
            LookupFailure::NotFound(reason) | LookupFailure::Failed(reason) => {
                ChatError::WeatherError(reason)
            }
        })?;

        let humidity = payload.main.humidity.ok_or_else(|| {
            ChatError::WeatherError("provider payload has no humidity".to_string())
        })?;
        Ok(WeatherSnapshot {
            city: payload.name,
            temperature: payload.main.temp,
            humidity,
            wind_speed: payload.wind.speed,
            condition: payload
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
        })
    }
}
