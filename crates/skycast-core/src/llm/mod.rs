//! Completion endpoint abstraction.
//!
//! The orchestrator talks to the model only through the [`LLM`] trait, so tests
//! can script responses and the provider can be swapped without touching the
//! control loop.

pub use crate::core_types::{LLMResponse, Message};
use crate::errors::ChatError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod providers;

pub use providers::openai::OpenAIClient;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[async_trait]
pub trait LLM: Send + Sync {
    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<ToolMetadata>>,
    ) -> Result<LLMResponse, ChatError>;
}
