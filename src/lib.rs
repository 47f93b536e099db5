//! Weather MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing weather, geocoding,
//! location and flight-search tools backed by public web APIs.
//!
//! # Architecture
//!
//! - **cli**: Command-line arguments
//! - **core**: Core infrastructure including configuration, error handling, the main server
//!   and the transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **providers**: One component per upstream API, behind an `HttpFetcher` seam
//!   - **tools**: MCP tools that can be executed by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use weather_mcp_server::{core::McpServer, core::Config, core::TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env(true);
//!     config.validate()?;
//!     let transport = TransportService::new(config.transport.clone());
//!     transport.run(McpServer::new(config)).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
