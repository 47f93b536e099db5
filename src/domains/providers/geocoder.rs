//! Place-name geocoding via Nominatim.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

use super::client::{ApiRequest, HttpFetcher, decode};
use super::{Coordinate, ProviderError};

/// Coordinates for a resolved place.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

impl GeocodeResult {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// One entry of Nominatim's match list.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(deserialize_with = "number_or_string")]
    lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    lon: f64,
    #[serde(default)]
    display_name: Option<String>,
}

impl From<NominatimPlace> for GeocodeResult {
    fn from(place: NominatimPlace) -> Self {
        Self {
            latitude: place.lat,
            longitude: place.lon,
            display_name: place.display_name,
        }
    }
}

// Nominatim sends coordinates as strings ("45.0677551"); accept both forms.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Resolves free-form place names to coordinates.
pub struct Geocoder {
    fetcher: Arc<dyn HttpFetcher>,
    endpoint: String,
    user_agent: String,
}

impl Geocoder {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, endpoint: &str, user_agent: String) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.to_string(),
            user_agent,
        }
    }

    /// Look up `place_name` and return the first match.
    #[instrument(skip(self))]
    pub async fn resolve(&self, place_name: &str) -> Result<GeocodeResult, ProviderError> {
        let request = ApiRequest::get(&self.endpoint)
            .query("q", place_name)
            .query("format", "json")
            .query("limit", 1)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "application/json");

        let matches: Vec<NominatimPlace> = self
            .fetcher
            .get_json(request)
            .await
            .and_then(decode)
            .map_err(|e| {
                warn!(error = %e, "Geocoding request failed");
                ProviderError::Geocode
            })?;

        let place = matches.into_iter().next().ok_or_else(|| {
            warn!("No geocoding match for '{}'", place_name);
            ProviderError::Geocode
        })?;

        Ok(place.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::providers::FetchError;
    use crate::domains::providers::client::testing::ScriptedFetcher;
    use serde_json::json;

    const ENDPOINT: &str = "https://nominatim.test/search";

    fn geocoder(fetcher: Arc<ScriptedFetcher>) -> Geocoder {
        Geocoder::new(fetcher, ENDPOINT, "weather-app/1.0 (ops@example.org)".to_string())
    }

    #[tokio::test]
    async fn test_resolve_parses_string_coordinates() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            ENDPOINT,
            json!([{
                "lat": "45.0677551",
                "lon": "7.6824892",
                "display_name": "Torino, Piemonte, Italia"
            }]),
        ));

        let result = geocoder(fetcher.clone()).resolve("Turin").await.unwrap();

        assert_eq!(result.latitude, 45.0677551);
        assert_eq!(result.longitude, 7.6824892);
        assert_eq!(result.display_name.as_deref(), Some("Torino, Piemonte, Italia"));
    }

    #[tokio::test]
    async fn test_resolve_accepts_numeric_coordinates() {
        let fetcher = Arc::new(
            ScriptedFetcher::new().respond(ENDPOINT, json!([{ "lat": 48.85, "lon": 2.35 }])),
        );

        let result = geocoder(fetcher).resolve("Paris").await.unwrap();

        assert_eq!(result.coordinate(), Coordinate::new(48.85, 2.35));
        assert_eq!(result.display_name, None);
    }

    #[tokio::test]
    async fn test_resolve_sends_single_match_query() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(ENDPOINT, json!([])));

        let _ = geocoder(fetcher.clone()).resolve("Antibes").await;

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.query_value("q"), Some("Antibes"));
        assert_eq!(request.query_value("format"), Some("json"));
        assert_eq!(request.query_value("limit"), Some("1"));
        assert_eq!(
            request.header_value("User-Agent"),
            Some("weather-app/1.0 (ops@example.org)")
        );
    }

    #[tokio::test]
    async fn test_zero_matches_is_failure() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(ENDPOINT, json!([])));

        let result = geocoder(fetcher).resolve("Nowhere").await;

        assert!(matches!(result, Err(ProviderError::Geocode)));
    }

    #[tokio::test]
    async fn test_network_error_is_failure() {
        let fetcher = Arc::new(ScriptedFetcher::new().fail(ENDPOINT, FetchError::Timeout));

        let err = geocoder(fetcher).resolve("Turin").await.unwrap_err();

        assert_eq!(err.to_string(), "Unable to geocode the provided location.");
    }

    #[tokio::test]
    async fn test_unparseable_coordinate_is_failure() {
        let fetcher = Arc::new(
            ScriptedFetcher::new().respond(ENDPOINT, json!([{ "lat": "north", "lon": "7.68" }])),
        );

        let result = geocoder(fetcher).resolve("Turin").await;

        assert!(matches!(result, Err(ProviderError::Geocode)));
    }
}
