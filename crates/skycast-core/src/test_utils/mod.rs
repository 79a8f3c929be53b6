//! In-process HTTP doubles for the completion endpoint and the weather provider.

pub mod mock_llm_server;
pub mod mock_weather_server;
