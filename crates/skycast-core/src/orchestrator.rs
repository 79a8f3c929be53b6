//! Tool-calling control loop.
//!
//! One chat turn is a bounded exchange with the completion endpoint: the model
//! either answers in text, which ends the turn, or asks for tool calls, which
//! are executed in order and fed back before asking again. After
//! `max_iterations` rounds of tool calls the turn ends with a fixed apology
//! instead of an error.
//!
//! The orchestrator itself is immutable and can be shared between concurrent
//! turns; all per-turn state lives in a [`ConversationState`] built from the
//! caller's history.

use std::sync::Arc;

use crate::conversation::{append_turn, expand_history, Turn, SYSTEM_PROMPT};
use crate::core_types::{Message, ToolCall, ToolResult};
use crate::errors::ChatError;
use crate::llm::{ToolMetadata, LLM};
use crate::tools::{declared_tools, GetWeatherArgs, WEATHER_TOOL_NAME};
use crate::weather::WeatherLookup;

pub const MAX_ITERATIONS: usize = 5;
pub const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble processing your request.";

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Completion round-trips that may end in tool calls before giving up.
    pub max_iterations: usize,
    pub system_prompt: String,
    pub fallback_reply: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            system_prompt: SYSTEM_PROMPT.to_string(),
            fallback_reply: FALLBACK_REPLY.to_string(),
        }
    }
}

/// One caller request: the new message plus everything the caller remembers.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<Turn>,
    pub last_city: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub reply: String,
    pub history: Vec<Turn>,
    pub last_city: Option<String>,
}

/// Per-turn working state. Never shared, dropped once the turn completes.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub last_city: Option<String>,
    pub iteration_count: usize,
}

impl ConversationState {
    pub fn new(
        system_prompt: &str,
        history: &[Turn],
        user_text: &str,
        last_city: Option<String>,
    ) -> Self {
        Self {
            messages: expand_history(system_prompt, history, user_text),
            last_city,
            iteration_count: 0,
        }
    }
}

pub struct ChatOrchestrator {
    llm: Arc<dyn LLM>,
    weather: Arc<dyn WeatherLookup>,
    tools: Vec<ToolMetadata>,
    config: OrchestratorConfig,
}

impl ChatOrchestrator {
    pub fn new(llm: Arc<dyn LLM>, weather: Arc<dyn WeatherLookup>) -> Self {
        Self::with_config(llm, weather, OrchestratorConfig::default())
    }

    pub fn with_config(
        llm: Arc<dyn LLM>,
        weather: Arc<dyn WeatherLookup>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            llm,
            weather,
            tools: declared_tools(),
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn weather(&self) -> &Arc<dyn WeatherLookup> {
        &self.weather
    }

    /// Runs one full chat turn. Only blank input and completion failures are
    /// errors; every other problem is absorbed into the reply.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatOutcome, ChatError> {
        let user_text = request.message.trim();
        if user_text.is_empty() {
            return Err(ChatError::ValidationError("message required".to_string()));
        }

        log::info!(
            "Chat turn started: {} prior turn(s), last city {:?}",
            request.history.len(),
            request.last_city
        );

        let mut state = ConversationState::new(
            &self.config.system_prompt,
            &request.history,
            user_text,
            request.last_city,
        );
        let reply = self.run(&mut state).await?;

        Ok(ChatOutcome {
            history: append_turn(&request.history, user_text, &reply),
            reply,
            last_city: state.last_city,
        })
    }

    /// Drives the completion/tool loop until the model answers in text or the
    /// iteration budget runs out.
    pub async fn run(&self, state: &mut ConversationState) -> Result<String, ChatError> {
        while state.iteration_count < self.config.max_iterations {
            log::info!("Completion round-trip #{}", state.iteration_count + 1);

            let response = self
                .llm
                .generate(state.messages.clone(), Some(self.tools.clone()))
                .await
                .map_err(|e| {
                    log::error!("Completion call failed: {}", e);
                    e
                })?;

            if !response.has_tool_calls() {
                let reply = response.content.unwrap_or_default();
                log::info!(
                    "Final reply after {} tool round(s) ({} chars)",
                    state.iteration_count,
                    reply.len()
                );
                return Ok(reply);
            }

            let tool_calls = response.tool_calls.unwrap_or_default();
            state.messages.push(Message::assistant_with_tool_calls(
                response.content.unwrap_or_default(),
                tool_calls.clone(),
            ));

            for call in &tool_calls {
                let result = self.execute_tool_call(state, call).await;
                state.messages.push(Message::tool_result(result));
            }

            state.iteration_count += 1;
        }

        log::warn!(
            "No final reply after {} completion round-trips, falling back",
            self.config.max_iterations
        );
        Ok(self.config.fallback_reply.clone())
    }

    /// Executes one tool call and returns its result. Always yields a result so
    /// every call id the model emitted gets an answer.
    pub async fn execute_tool_call(
        &self,
        state: &mut ConversationState,
        call: &ToolCall,
    ) -> ToolResult {
        log::info!("Action: calling tool '{}' with args {}", call.name, call.arguments);

        let content = match call.name.as_str() {
            WEATHER_TOOL_NAME => {
                let args = GetWeatherArgs::decode(&call.arguments);
                if let Some(city) = args.effective_city() {
                    state.last_city = Some(city.to_string());
                }
                self.weather.fetch(&args.city, args.mode).await
            }
            other => {
                log::warn!("Model requested unknown tool '{}'", other);
                format!(
                    "Unknown tool \"{}\"; only {} is available.",
                    other, WEATHER_TOOL_NAME
                )
            }
        };

        ToolResult {
            tool_call_id: call.id.clone(),
            content,
        }
    }
}
