//! Providers domain module.
//!
//! Each component wraps one upstream web API and turns its JSON into typed
//! records and fixed-format text. Components never call each other, except
//! that the forecast resolver sequences the NWS and Open-Meteo providers.
//!
//! ## Architecture
//!
//! - `client.rs` - `HttpFetcher` seam and the reqwest implementation
//! - `error.rs` - `FetchError` (wire) and `ProviderError` (user-facing)
//! - `geocoder.rs`, `location.rs`, `alerts.rs`, `forecast.rs`, `flights.rs` -
//!   one component per upstream service

pub mod alerts;
pub mod client;
mod error;
pub mod flights;
pub mod forecast;
pub mod geocoder;
pub mod location;

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::Config;

pub use alerts::{Alert, AlertFetcher};
pub use client::{ApiRequest, HttpFetcher, ReqwestFetcher};
pub use error::{FetchError, ProviderError};
pub use flights::{FlightListing, FlightOffer, FlightSearch};
pub use forecast::{Forecast, ForecastResolver};
pub use geocoder::{GeocodeResult, Geocoder};
pub use location::LocationResolver;

/// Media type the NWS API serves.
const GEO_JSON: &str = "application/geo+json";

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// GET request to the National Weather Service with its required headers.
fn nws_request(url: impl Into<String>, user_agent: &str) -> ApiRequest {
    ApiRequest::get(url)
        .header("User-Agent", user_agent)
        .header("Accept", GEO_JSON)
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// All provider components, built once from the startup configuration.
pub struct Providers {
    pub geocoder: Geocoder,
    pub location: LocationResolver,
    pub alerts: AlertFetcher,
    pub forecast: ForecastResolver,
    pub flights: FlightSearch,
}

impl Providers {
    /// Build the providers with the production reqwest fetcher.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.providers.request_timeout_secs);
        Self::with_fetcher(config, Arc::new(ReqwestFetcher::new(timeout)))
    }

    /// Build the providers around an arbitrary fetcher.
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn HttpFetcher>) -> Self {
        let providers = &config.providers;
        let credentials = &config.credentials;

        Self {
            geocoder: Geocoder::new(
                fetcher.clone(),
                &providers.geocode_url,
                providers.geocode_user_agent(&credentials.contact_email),
            ),
            location: LocationResolver::new(fetcher.clone(), &providers.ip_location_url),
            alerts: AlertFetcher::new(fetcher.clone(), &providers.nws_base_url, &providers.user_agent),
            forecast: ForecastResolver::new(
                fetcher.clone(),
                &providers.nws_base_url,
                &providers.open_meteo_base_url,
                &providers.user_agent,
            ),
            flights: FlightSearch::new(
                fetcher,
                &providers.flights_url,
                credentials.serpapi_api_key.clone(),
            ),
        }
    }
}
