//! Current location tool definition.

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

/// The location tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetCurrentLocationParams {}

/// Location tool - the city of the server's public IP address.
pub struct GetCurrentLocationTool;

impl GetCurrentLocationTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_current_location";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the user's current city from their public IP address. Combine with geocode_city to obtain coordinates.";

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub async fn execute(providers: &Providers) -> CallToolResult {
        info!("Current location tool called");

        match providers.location.current_location().await {
            Ok(city) => success_result(city),
            Err(e) => error_result(&e.to_string()),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        providers: Arc<Providers>,
    ) -> Result<serde_json::Value, ToolError> {
        let _: GetCurrentLocationParams = super::common::parse_arguments(arguments)?;
        let result = Self::execute(&providers).await;
        super::common::to_http_response(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetCurrentLocationParams>(),
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
        ToolRoute::new_dyn(Self::to_tool(), move |_ctx: ToolCallContext<'_, S>| {
            let providers = providers.clone();
            async move { Ok::<_, McpError>(Self::execute(&providers).await) }.boxed()
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

    const IP_API: &str = "http://ip-api.com/json/";

    #[tokio::test]
    async fn test_returns_city_name() {
        let fetcher = Arc::new(
            ScriptedFetcher::new().respond(IP_API, json!({ "status": "success", "city": "Turin" })),
        );
        let providers = test_providers(fetcher);

        let result = GetCurrentLocationTool::execute(&providers).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(result_text(&result), "Turin");
    }

    #[tokio::test]
    async fn test_failure_is_error_text() {
        let fetcher = Arc::new(
            ScriptedFetcher::new().fail(IP_API, FetchError::Connect("refused".to_string())),
        );
        let providers = test_providers(fetcher);

        let result = GetCurrentLocationTool::execute(&providers).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Unable to geocode the user location.");
    }

    #[test]
    fn test_schema_has_no_required_fields() {
        let tool = GetCurrentLocationTool::to_tool();
        assert!(tool.input_schema.get("required").is_none());
    }
}
