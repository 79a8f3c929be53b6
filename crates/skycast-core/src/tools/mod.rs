//! Tool declarations exposed to the completion endpoint
//!
//! Only one capability is declared today, the weather lookup. The orchestrator
//! dispatches on the tool name, so adding a tool means adding its metadata here
//! and a branch in the dispatcher.

use crate::llm::ToolMetadata;

pub mod get_weather;

pub use get_weather::{GetWeatherArgs, WEATHER_TOOL_NAME};

/// Metadata for every tool the model may call, in declaration order.
pub fn declared_tools() -> Vec<ToolMetadata> {
    vec![get_weather::metadata()]
}
