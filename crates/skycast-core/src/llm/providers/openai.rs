use crate::config::LlmSettings;
use crate::core_types::{LLMResponse, Message, Role, ToolCall, Usage};
use crate::errors::ChatError;
use crate::llm::{ToolMetadata, LLM};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use serde_json::{json, Value};

/// Client for OpenAI-compatible chat-completions endpoints (OpenRouter by default).
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    referer: Option<String>,
    title: Option<String>,
}

impl OpenAIClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Self::build_http_client(Duration::from_secs(30)),
            api_key,
            api_base: crate::config::DEFAULT_OPENROUTER_URL.to_string(),
            model,
            temperature: None,
            max_tokens: None,
            referer: None,
            title: None,
        }
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

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::build_http_client(timeout);
        self
    }

    /// Identification headers OpenRouter uses to attribute requests.
    pub fn with_app_identity(mut self, referer: String, title: String) -> Self {
        self.referer = Some(referer);
        self.title = Some(title);
        self
    }

    fn build_request_body(&self, messages: &[Message], tools: Option<&[ToolMetadata]>) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.format_messages(messages),
        });

        if let Some(temp) = self.temperature {
            body["temperature"] = temp.into();
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = max_tokens.into();
        }

        if let Some(tools) = tools {
            if !tools.is_empty() {
                log::debug!(
                    "Declaring {} tool(s) to the model: {:?}",
                    tools.len(),
                    tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
                );
                let formatted_tools: Vec<Value> = tools
                    .iter()
                    .map(|tool| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": tool.name,
                                "description": tool.description,
                                "parameters": tool.input_schema
                            }
                        })
                    })
                    .collect();
                body["tools"] = formatted_tools.into();
            }
        }

        body
    }

    fn format_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                let mut message = json!({
                    "role": msg.role.as_str(),
                    "content": msg.content
                });

                if let Role::Tool = msg.role {
                    if let Some(tool_call_id) = &msg.tool_call_id {
                        message["tool_call_id"] = json!(tool_call_id);
                    }
                }

                if let Role::Assistant = msg.role {
                    if let Some(tool_calls) = &msg.tool_calls {
                        if !tool_calls.is_empty() {
                            let formatted_tool_calls: Vec<Value> = tool_calls
                                .iter()
                                .map(|tc| {
                                    json!({
                                        "id": tc.id,
                                        "type": "function",
                                        "function": {
                                            "name": tc.name,
                                            "arguments": tc.arguments
                                        }
                                    })
                                })
                                .collect();
                            message["tool_calls"] = json!(formatted_tool_calls);
                        }
                    }
                }

                message
            })
            .collect()
    }
}

#[async_trait]
impl LLM for OpenAIClient {
    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<ToolMetadata>>,
    ) -> Result<LLMResponse, ChatError> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = self.build_request_body(&messages, tools.as_deref());

        log::debug!("Completion request to {} with {} message(s)", url, messages.len());
        for (i, msg) in messages.iter().enumerate() {
            log::trace!(
                "  Message #{}: role={:?}, content={}, tool_call_id={:?}",
                i,
                msg.role,
                msg.content,
                msg.tool_call_id
            );
        }

        let mut request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::LLMError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ChatError::LLMError(format!("Failed to read response: {}", e)))?;

        log::debug!("Completion response ({}): {}", status, response_text);

        if !status.is_success() {
            return Err(ChatError::LLMError(format!(
                "API request failed with status {}: {}",
                status, response_text
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| ChatError::ParsingError(format!("Invalid JSON response: {}", e)))?;

        self.parse_response(response_json)
    }
}

impl OpenAIClient {
    fn parse_response(&self, response: Value) -> Result<LLMResponse, ChatError> {
        let choices = response["choices"]
            .as_array()
            .ok_or_else(|| ChatError::ParsingError("No choices in response".to_string()))?;

        let choice = choices
            .first()
            .ok_or_else(|| ChatError::ParsingError("Empty choices array".to_string()))?;
        let message = choice["message"]
            .as_object()
            .ok_or_else(|| ChatError::ParsingError("Choice has no message".to_string()))?;

        let content = message
            .get("content")
            .and_then(Value::as_str)
            .map(|s| s.to_string());

        let tool_calls = match message.get("tool_calls").and_then(Value::as_array) {
            Some(calls) => {
                let mut parsed_calls = Vec::with_capacity(calls.len());
                for call in calls {
                    let Some(function) = call["function"].as_object() else {
                        log::warn!("Skipping tool call without function: {}", call);
                        continue;
                    };
                    let Some(name) = function.get("name").and_then(Value::as_str) else {
                        log::warn!("Skipping tool call without name: {}", call);
                        continue;
                    };
                    // Some providers send the arguments as an object instead of a string.
                    let arguments = match function.get("arguments") {
                        Some(Value::String(s)) => s.clone(),
                        Some(Value::Null) | None => "{}".to_string(),
                        Some(other) => other.to_string(),
                    };
                    let id = call["id"].as_str().map(|s| s.to_string()).unwrap_or_else(|| {
                        format!("call_{}", uuid::Uuid::new_v4().simple())
                    });

                    parsed_calls.push(ToolCall {
                        id,
                        name: name.to_string(),
                        arguments,
                    });
                }
                if parsed_calls.is_empty() {
                    None
                } else {
                    Some(parsed_calls)
                }
            }
            None => None,
        };

        let finish_reason = choice["finish_reason"].as_str().map(|s| s.to_string());
        let usage = response
            .get("usage")
            .and_then(|u| serde_json::from_value::<Usage>(u.clone()).ok());

        Ok(LLMResponse {
            content,
            tool_calls,
            finish_reason,
            usage,
        })
    }
}

/// Create an OpenAI-compatible LLM client from settings
pub fn create_client(settings: &LlmSettings) -> Result<std::sync::Arc<dyn LLM>, ChatError> {
    if settings.api_key.trim().is_empty() {
        return Err(ChatError::ConfigError(
            "No API key configured for the completion endpoint".to_string(),
        ));
    }

    let client = OpenAIClient::new(settings.api_key.clone(), settings.model.clone())
        .with_api_base(settings.api_base.clone())
        .with_temperature(settings.temperature)
        .with_max_tokens(settings.max_tokens)
        .with_timeout(settings.timeout())
        .with_app_identity(settings.app_url.clone(), settings.app_title.clone());

    Ok(std::sync::Arc::new(client))
}
