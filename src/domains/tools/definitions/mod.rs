//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod common;
pub mod geocode_city;
pub mod get_alerts;
pub mod get_current_location;
pub mod get_flights;
pub mod get_forecast;

pub use geocode_city::{GeocodeCityParams, GeocodeCityTool};
pub use get_alerts::{GetAlertsParams, GetAlertsTool};
pub use get_current_location::{GetCurrentLocationParams, GetCurrentLocationTool};
pub use get_flights::{GetFlightsParams, GetFlightsTool};
pub use get_forecast::{GetForecastParams, GetForecastTool};
