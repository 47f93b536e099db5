//! Provider error types.
//!
//! `FetchError` describes what went wrong on the wire. `ProviderError` is what
//! a component reports to its caller: one variant per user-facing failure
//! message. Empty results are not errors and never appear here.

use thiserror::Error;

/// Failure of a single outbound request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The provider could not be reached.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The body was not JSON or did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Any other request failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The HTTP client itself could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // The URL may carry credentials in its query string
        let e = e.without_url();
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Failure reported by a provider component.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unable to geocode the provided location.")]
    Geocode,

    #[error("Unable to geocode the user location.")]
    Location,

    #[error("Unable to fetch alerts or no alerts found.")]
    Alerts,

    #[error("Unable to fetch detailed forecast.")]
    DetailedForecast,

    #[error("Unable to fetch forecast data from any provider.")]
    NoForecastProvider,

    #[error("Unable to fetch flight data due to a network or API error: {0}")]
    Flights(#[source] FetchError),

    #[error("Unable to fetch flight data: {0} is not configured.")]
    MissingCredential(&'static str),
}
