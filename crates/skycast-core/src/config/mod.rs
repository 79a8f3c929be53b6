//! Configuration module for the chat service
//!
//! Configuration is resolved once at startup from environment variables
//! (optionally seeded from a `.env` file) and then handed to the clients.

pub mod types;
pub mod loader;

pub use types::*;
pub use loader::*;


use crate::errors::ChatError;

/// Load the configuration from the environment
pub fn load_config() -> Result<AppConfig, ChatError> {
    ConfigLoader::from_env()
}
