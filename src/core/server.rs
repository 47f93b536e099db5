//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use crate::domains::{providers::Providers, tools::build_tool_router};

#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, ToolRegistry};

/// Instructions advertised to MCP clients.
pub const SERVER_INSTRUCTIONS: &str = "Weather and travel tools: geocode places, read US weather alerts, get forecasts (NWS with a global fallback), locate the user by IP, and list today's flights between two airports.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. It owns the
/// provider components, which are read-only after startup.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Upstream provider components shared by all tools.
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    providers: Arc<Providers>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let providers = Arc::new(Providers::from_config(&config));
        Self::with_providers(config, providers)
    }

    /// Create a server around already-built providers.
    pub fn with_providers(config: Config, providers: Arc<Providers>) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(providers.clone()),
            config: Arc::new(config),
            providers,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                let mut tool = serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                });
                if let Some(schema) = t.output_schema {
                    tool["outputSchema"] = serde_json::Value::Object(schema.as_ref().clone());
                }
                tool
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.providers.clone());
        registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_identity() {
        let server = McpServer::new(Config::default());
        assert_eq!(server.name(), "weather");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_server_lists_five_tools() {
        let server = McpServer::new(Config::default());
        let tools = server.list_tools();
        assert_eq!(tools.len(), 5);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[test]
    fn test_list_tools_includes_output_schema() {
        let tools = McpServer::new(Config::default()).list_tools();
        let geocode = tools
            .iter()
            .find(|t| t["name"] == "geocode_city")
            .unwrap();
        assert!(geocode["outputSchema"].is_object());

        let alerts = tools.iter().find(|t| t["name"] == "get_alerts").unwrap();
        assert!(alerts.get("outputSchema").is_none());
    }

    #[test]
    fn test_capabilities_are_tools_only() {
        let info = McpServer::new(Config::default()).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }
}
