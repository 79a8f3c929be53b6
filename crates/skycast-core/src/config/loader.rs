//! Configuration loader for environment variables
//!
//! Values are read from the process environment after an optional `.env`
//! file has been merged in. Lookups go through a closure so tests can supply
//! their own variables without touching the real environment.

use std::env;

use crate::config::types::*;
use crate::errors::ChatError;

pub const ENV_OPENROUTER_KEY: &str = "OPENROUTER_KEY";
pub const ENV_OPEN_WEATHER_API_KEY: &str = "OPEN_WEATHER_API_KEY";
pub const ENV_PORT: &str = "PORT";
pub const ENV_APP_URL: &str = "APP_URL";
pub const ENV_APP_TITLE: &str = "APP_TITLE";
pub const ENV_LLM_MODEL: &str = "LLM_MODEL";
pub const ENV_OPENROUTER_URL: &str = "OPENROUTER_URL";
pub const ENV_OPENWEATHER_URL: &str = "OPENWEATHER_URL";

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the process environment, merging a `.env`
    /// file from the working directory first when one exists.
    pub fn from_env() -> Result<AppConfig, ChatError> {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => log::debug!("No .env file found, using process environment"),
            Err(e) => {
                return Err(ChatError::ConfigError(format!(
                    "Failed to read .env file: {}",
                    e
                )))
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm_key = get(ENV_OPENROUTER_KEY).ok_or_else(|| {
            ChatError::ConfigError(format!("{} is not set", ENV_OPENROUTER_KEY))
        })?;
        let weather_key = get(ENV_OPEN_WEATHER_API_KEY).ok_or_else(|| {
            ChatError::ConfigError(format!("{} is not set", ENV_OPEN_WEATHER_API_KEY))
        })?;

        let mut llm = LlmSettings::new(llm_key);
        if let Some(model) = get(ENV_LLM_MODEL) {
            llm.model = model;
        }
        if let Some(base) = get(ENV_OPENROUTER_URL) {
            llm.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(url) = get(ENV_APP_URL) {
            llm.app_url = url;
        }
        if let Some(title) = get(ENV_APP_TITLE) {
            llm.app_title = title;
        }

        let mut weather = WeatherSettings::new(weather_key);
        if let Some(base) = get(ENV_OPENWEATHER_URL) {
            weather.api_base = base.trim_end_matches('/').to_string();
        }

        let port = match get(ENV_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                ChatError::ConfigError(format!("Invalid {} '{}': {}", ENV_PORT, raw, e))
            })?,
            None => 3000,
        };

        let config = AppConfig { llm, weather, port };
        config.validate()?;
        log::debug!(
            "Configuration resolved: model={}, llm_base={}, weather_base={}, port={}",
            config.llm.model,
            config.llm.api_base,
            config.weather.api_base,
            config.port
        );
        Ok(config)
    }
}
