//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::providers::Providers;

use super::definitions::{
    GeocodeCityTool, GetAlertsTool, GetCurrentLocationTool, GetFlightsTool, GetForecastTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(providers: Arc<Providers>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GeocodeCityTool::create_route(providers.clone()))
        .with_route(GetAlertsTool::create_route(providers.clone()))
        .with_route(GetForecastTool::create_route(providers.clone()))
        .with_route(GetCurrentLocationTool::create_route(providers.clone()))
        .with_route(GetFlightsTool::create_route(providers))
}
