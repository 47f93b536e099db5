//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::domains::providers::Providers;
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

use super::definitions::{
    GeocodeCityTool, GetAlertsTool, GetCurrentLocationTool, GetFlightsTool, GetForecastTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    providers: Arc<Providers>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(providers: Arc<Providers>) -> Self {
        Self { providers }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            GeocodeCityTool::NAME,
            GetAlertsTool::NAME,
            GetForecastTool::NAME,
            GetCurrentLocationTool::NAME,
            GetFlightsTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Used by the HTTP transport for `tools/list`.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            GeocodeCityTool::to_tool(),
            GetAlertsTool::to_tool(),
            GetForecastTool::to_tool(),
            GetCurrentLocationTool::to_tool(),
            GetFlightsTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let providers = self.providers.clone();
        match name {
            GeocodeCityTool::NAME => GeocodeCityTool::http_handler(arguments, providers).await,
            GetAlertsTool::NAME => GetAlertsTool::http_handler(arguments, providers).await,
            GetForecastTool::NAME => GetForecastTool::http_handler(arguments, providers).await,
            GetCurrentLocationTool::NAME => {
                GetCurrentLocationTool::http_handler(arguments, providers).await
            }
            GetFlightsTool::NAME => GetFlightsTool::http_handler(arguments, providers).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}
