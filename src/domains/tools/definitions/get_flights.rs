//! Flight search tool definition.

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
use crate::domains::providers::Providers;
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the flight search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFlightsParams {
    /// IATA code of the departure airport (e.g. TRN).
    pub dept_iata: String,

    /// IATA code of the arrival airport (e.g. CDG).
    pub arr_iata: String,
}

/// Flight search tool - today's one-way flights between two airports.
pub struct GetFlightsTool;

impl GetFlightsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_flights";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List today's one-way flights between two airports given their IATA codes, ordered by departure time.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(from = %params.dept_iata, to = %params.arr_iata))]
    pub async fn execute(params: &GetFlightsParams, providers: &Providers) -> CallToolResult {
        info!(
            "Flights tool called: {} -> {}",
            params.dept_iata, params.arr_iata
        );

        match providers
            .flights
            .search_flights(&params.dept_iata, &params.arr_iata)
            .await
        {
            Ok(listing) => success_result(listing.render()),
            Err(e) => error_result(&e.to_string()),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        providers: Arc<Providers>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetFlightsParams = super::common::parse_arguments(arguments)?;
        let result = Self::execute(&params, &providers).await;
        super::common::to_http_response(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetFlightsParams>(),
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
                let params: GetFlightsParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &providers).await)
            }
            .boxed()
        })
    }
}
