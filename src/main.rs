//! MCP Server Entry Point
//!
//! Initializes logging, loads and validates configuration, and starts the
//! server with the configured transport. Pass `--local` to serve over
//! stdin/stdout instead of the network.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use weather_mcp_server::cli::Cli;
use weather_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = Config::from_env(cli.local);

    // Initialize logging
    init_logging(&config.logging.level);

    config.validate()?;

    info!("Starting {} v{}", config.server.name, config.server.version);
    if config.credentials.serpapi_api_key.is_none() {
        warn!("No SerpApi key configured (set MCP_SERPAPI_KEY); get_flights will report an error");
    }

    let transport = TransportService::new(config.transport.clone());

    // Create the MCP server
    let server = McpServer::new(config);

    info!("Server initialized");

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr so the STDIO transport keeps stdout clean.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
