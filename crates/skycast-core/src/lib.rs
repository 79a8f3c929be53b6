//! Core of the weather chat assistant.
//!
//! A chat turn takes the caller's message and prior history, lets a language
//! model decide whether it needs weather data, runs the requested lookups and
//! returns the model's final reply with the updated history.
//!
//! # Architecture Overview
//!
//! - **Orchestration**: the bounded completion/tool loop in [`orchestrator`]
//! - **Language model integration**: the [`LLM`] trait and its OpenAI-compatible provider
//! - **Weather lookups**: the [`WeatherLookup`] trait backed by OpenWeatherMap
//! - **Tools**: declarations and argument decoding for `get_weather`
//! - **Conversation**: the caller-facing history format and its expansion into model messages
//! - **Configuration**: environment-driven settings for both upstreams

pub mod config;
pub mod conversation;
pub mod core_types;
pub mod errors;
pub mod llm;
pub mod orchestrator;
pub mod tools;
pub mod weather;

pub use config::*;
pub use conversation::{Turn, TurnKind};
pub use errors::ChatError;
pub use llm::LLM;
pub use orchestrator::{ChatOrchestrator, ChatOutcome, ChatRequest, OrchestratorConfig};
pub use weather::{OpenWeatherClient, WeatherLookup, WeatherMode, WeatherSnapshot};

#[cfg(test)]
pub mod test_utils;
