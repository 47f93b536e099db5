//! Weather alerts tool definition.

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
use crate::domains::providers::alerts::render_alerts;
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the alerts tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAlertsParams {
    /// Two-letter US state code (e.g. CA, NY).
    pub state: String,
}

/// Alerts tool - active NWS alerts for a US state.
pub struct GetAlertsTool;

impl GetAlertsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_alerts";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get active weather alerts for a US state. Takes a two-letter state code (e.g. CA, NY).";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(state = %params.state))]
    pub async fn execute(params: &GetAlertsParams, providers: &Providers) -> CallToolResult {
        info!("Alerts tool called for '{}'", params.state);

        match providers.alerts.alerts_for_region(&params.state).await {
            Ok(alerts) => success_result(render_alerts(&alerts)),
            Err(e) => error_result(&e.to_string()),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        providers: Arc<Providers>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetAlertsParams = super::common::parse_arguments(arguments)?;
        let result = Self::execute(&params, &providers).await;
        super::common::to_http_response(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetAlertsParams>(),
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
                let params: GetAlertsParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &providers).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::providers::FetchError;
    use crate::domains::providers::client::testing::ScriptedFetcher;
    use crate::domains::tools::definitions::common::{result_text, test_providers};
    use serde_json::json;

    const NWS_ALERTS: &str = "https://api.weather.gov/alerts/";

    fn params(state: &str) -> GetAlertsParams {
        GetAlertsParams {
            state: state.to_string(),
        }
    }

    #[tokio::test]
    async fn test_alerts_rendered_as_blocks() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            NWS_ALERTS,
            json!({ "features": [
                { "properties": { "event": "Wind Advisory", "areaDesc": "Kern",
                                  "severity": "Moderate", "description": "Gusty.",
                                  "instruction": "Secure objects." } },
                { "properties": { "event": "Red Flag Warning" } }
            ]}),
        ));
        let providers = test_providers(fetcher.clone());

        let result = GetAlertsTool::execute(&params("CA"), &providers).await;

        let text = result_text(&result);
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text.matches("\n---\n").count(), 1);
        assert!(text.starts_with("Event: Wind Advisory\nArea: Kern\nSeverity: Moderate"));
        assert!(text.ends_with("Instructions: No specific instructions provided"));
        assert_eq!(
            fetcher.requests()[0].url,
            "https://api.weather.gov/alerts/active/area/CA"
        );
    }

    #[tokio::test]
    async fn test_no_alerts_is_success() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(NWS_ALERTS, json!({ "features": [] })));
        let providers = test_providers(fetcher);

        let result = GetAlertsTool::execute(&params("VT"), &providers).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(result_text(&result), "No active alerts for this state.");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_error_text() {
        let fetcher = Arc::new(ScriptedFetcher::new().fail(NWS_ALERTS, FetchError::Status(500)));
        let providers = test_providers(fetcher);

        let result = GetAlertsTool::execute(&params("CA"), &providers).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Unable to fetch alerts or no alerts found.");
    }
}
