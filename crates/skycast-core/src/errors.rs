//! Error types for chat turn failures
//!
//! Only two kinds of failure ever leave a chat turn: invalid caller input and
//! a failed completion call. Weather provider problems are folded into tool
//! content by the weather client and never surface here, except through the
//! structured snapshot lookup which reports them as `WeatherError`.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    #[error("LLM interaction failed: {0}")]
    LLMError(String),
    #[error("Parsing error: {0}")]
    ParsingError(String),
    #[error("Weather lookup failed: {0}")]
    WeatherError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ChatError {
    /// True for errors caused by the caller's input rather than by this service
    /// or one of its upstreams.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChatError::ValidationError(_))
    }
}
