//! LLM provider implementations
//!
//! The hosted deployment speaks the OpenAI chat-completions protocol through
//! OpenRouter, so a single OpenAI-compatible provider covers it.

use std::sync::Arc;

use crate::config::LlmSettings;
use crate::errors::ChatError;
use crate::llm::LLM;

pub mod openai;

/// Create the completion client described by the settings
pub fn create_llm_client(settings: &LlmSettings) -> Result<Arc<dyn LLM>, ChatError> {
    openai::create_client(settings)
}
