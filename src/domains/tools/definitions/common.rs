//! Common utilities shared across the weather and travel tools.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domains::tools::ToolError;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Create a success result carrying both JSON text and structured content.
pub fn structured_result<T: Serialize>(data: &T) -> CallToolResult {
    match serde_json::to_value(data) {
        Ok(value) => CallToolResult {
            content: vec![Content::text(value.to_string())],
            structured_content: Some(value),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Deserialize raw tool arguments into the tool's parameter type.
///
/// A `null` payload is treated as an empty object so that parameterless
/// tools accept calls without arguments.
pub fn parse_arguments<P: DeserializeOwned>(arguments: serde_json::Value) -> Result<P, ToolError> {
    let arguments = match arguments {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Serialize the full `CallToolResult` for the HTTP transport.
#[cfg(feature = "http")]
pub fn to_http_response(result: &CallToolResult) -> Result<serde_json::Value, ToolError> {
    serde_json::to_value(result).map_err(|e| ToolError::internal(e.to_string()))
}

/// First text block of a tool result.
#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> String {
    match result.content.first().map(|c| &c.raw) {
        Some(rmcp::model::RawContent::Text(text)) => text.text.clone(),
        _ => panic!("Expected text content"),
    }
}

/// Providers built from the default configuration around a scripted fetcher.
#[cfg(test)]
pub fn test_providers(
    fetcher: std::sync::Arc<crate::domains::providers::client::testing::ScriptedFetcher>,
) -> crate::domains::providers::Providers {
    let mut config = crate::core::config::Config::default();
    config.credentials.serpapi_api_key = Some("test-key".to_string());
    crate::domains::providers::Providers::with_fetcher(&config, fetcher)
}
