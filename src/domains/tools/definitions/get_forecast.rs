//! Forecast tool definition.
//!
//! Uses the NWS grid forecast when the coordinate is covered, otherwise the
//! Open-Meteo summary.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{error_result, success_result};
use crate::domains::providers::{Coordinate, Providers};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the forecast tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetForecastParams {
    /// Latitude of the location in decimal degrees.
    pub latitude: f64,

    /// Longitude of the location in decimal degrees.
    pub longitude: f64,
}

/// Forecast tool - weather forecast for a coordinate.
pub struct GetForecastTool;

impl GetForecastTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_forecast";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the weather forecast for a location given its latitude and longitude. Uses the US National Weather Service where available and a global provider elsewhere.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(latitude = params.latitude, longitude = params.longitude))]
    pub async fn execute(params: &GetForecastParams, providers: &Providers) -> CallToolResult {
        info!(
            "Forecast tool called for ({}, {})",
            params.latitude, params.longitude
        );

        let at = Coordinate::new(params.latitude, params.longitude);
        match providers.forecast.forecast(at).await {
            Ok(forecast) => {
                info!(provider = forecast.provider(), "Forecast resolved");
                success_result(forecast.render())
            }
            Err(e) => error_result(&e.to_string()),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        providers: Arc<Providers>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetForecastParams = super::common::parse_arguments(arguments)?;
        let result = Self::execute(&params, &providers).await;
        super::common::to_http_response(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetForecastParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(providers: Arc<Providers>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let providers = providers.clone();
            async move {
                let params: GetForecastParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &providers).await)
            }
            .boxed()
        })
    }
}
