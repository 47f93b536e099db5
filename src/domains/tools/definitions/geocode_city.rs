//! Geocode tool definition.
//!
//! Resolves a free-form place name to coordinates.

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

use super::common::{error_result, structured_result};
use crate::domains::providers::{GeocodeResult, Providers};
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

/// Parameters for the geocode tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeocodeCityParams {
    /// Place to look up, e.g. "Turin" or "Antibes, France".
    pub city: String,
}

/// Geocode tool - place name to latitude/longitude.
pub struct GeocodeCityTool;

impl GeocodeCityTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "geocode_city";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Geocode a city or place name to latitude and longitude. Use the coordinates with get_forecast.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(city = %params.city))]
    pub async fn execute(params: &GeocodeCityParams, providers: &Providers) -> CallToolResult {
        info!("Geocode tool called for '{}'", params.city);

        match providers.geocoder.resolve(&params.city).await {
            Ok(place) => structured_result(&place),
            Err(e) => error_result(&e.to_string()),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        providers: Arc<Providers>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GeocodeCityParams = super::common::parse_arguments(arguments)?;
        let result = Self::execute(&params, &providers).await;
        super::common::to_http_response(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GeocodeCityParams>(),
            annotations: None,
            output_schema: Some(cached_schema_for_type::<GeocodeResult>()),
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
                let params: GeocodeCityParams =
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

    const NOMINATIM: &str = "https://nominatim.openstreetmap.org/search";

    fn params(city: &str) -> GeocodeCityParams {
        GeocodeCityParams {
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn test_geocode_returns_structured_result() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            NOMINATIM,
            json!([{ "lat": "45.0677551", "lon": "7.6824892", "display_name": "Torino" }]),
        ));
        let providers = test_providers(fetcher.clone());

        let result = GeocodeCityTool::execute(&params("Turin"), &providers).await;

        assert_eq!(result.is_error, Some(false));
        let structured = result.structured_content.clone().unwrap();
        assert_eq!(structured["latitude"], 45.0677551);
        assert_eq!(structured["display_name"], "Torino");
        assert!(result_text(&result).contains("\"longitude\":7.6824892"));
        assert_eq!(
            fetcher.requests()[0].header_value("User-Agent"),
            Some("weather-app/1.0 (contact@example.com)")
        );
    }

    #[tokio::test]
    async fn test_geocode_failure_is_error_text() {
        let fetcher = Arc::new(ScriptedFetcher::new().fail(NOMINATIM, FetchError::Timeout));
        let providers = test_providers(fetcher);

        let result = GeocodeCityTool::execute(&params("Turin"), &providers).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Unable to geocode the provided location.");
    }

    #[test]
    fn test_tool_metadata() {
        let tool = GeocodeCityTool::to_tool();
        assert_eq!(tool.name, "geocode_city");
        assert!(tool.output_schema.is_some());
        let properties = tool.input_schema.get("properties").unwrap();
        assert!(properties.get("city").is_some());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_http_handler_rejects_missing_city() {
        let providers = Arc::new(test_providers(Arc::new(ScriptedFetcher::new())));

        let result = GeocodeCityTool::http_handler(json!({}), providers).await;

        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
