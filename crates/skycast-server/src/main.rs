//! skycast-server binary
//!
//! Loads configuration from the environment, wires the completion and weather
//! clients into a chat orchestrator and serves it over HTTP.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use skycast_core::config::load_config;
use skycast_core::llm::providers::create_llm_client;
use skycast_core::{ChatOrchestrator, OpenWeatherClient};
use skycast_server::{shutdown_signal, ChatServer, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "skycast-server")]
#[command(about = "Weather chat assistant backed by a tool-calling language model")]
#[command(version)]
struct Cli {
    /// Server bind address (defaults to 0.0.0.0 on $PORT)
    #[arg(long)]
    bind_addr: Option<String>,

    /// Log level
    #[arg(long, short, default_value = "info")]
    log_level: String,

    /// Upper bound on one chat turn, in seconds
    #[arg(long, default_value = "60")]
    request_timeout: u64,

    /// CORS allowed origins (comma-separated, any origin when omitted)
    #[arg(long)]
    cors_origins: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let app_config = load_config()?;
    log::info!(
        "Configuration loaded: model {}, completion endpoint {}",
        app_config.llm.model,
        app_config.llm.api_base
    );

    let bind_addr: SocketAddr = match cli.bind_addr {
        Some(ref addr) => addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", addr, e))?,
        None => SocketAddr::from(([0, 0, 0, 0], app_config.port)),
    };

    let llm = create_llm_client(&app_config.llm)?;
    let weather = Arc::new(OpenWeatherClient::from_settings(&app_config.weather));
    let orchestrator = Arc::new(ChatOrchestrator::new(llm, weather));

    let mut server_config = ServerConfig::new()
        .with_bind_addr(bind_addr)
        .with_request_timeout(Duration::from_secs(cli.request_timeout))
        .with_logging(true);
    if let Some(origins) = cli.cors_origins {
        server_config = server_config.with_cors_origins(
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        );
    }

    log::info!("Starting chat server on {}...", bind_addr);
    let server = ChatServer::with_config(orchestrator, server_config);

    if let Err(e) = server.serve_with_shutdown(shutdown_signal()).await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
