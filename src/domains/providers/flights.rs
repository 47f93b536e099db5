//! One-way flight search via SerpApi's Google Flights engine.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::client::{ApiRequest, HttpFetcher, decode};
use super::ProviderError;

/// Currency assumed when the response does not name one.
pub const DEFAULT_CURRENCY: &str = "EUR";

const DEPARTURE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    other_flights: Vec<RawOffer>,
    best_flights: Vec<RawOffer>,
    search_parameters: SearchParameters,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchParameters {
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOffer {
    flights: Vec<Segment>,
    total_duration: Option<u32>,
    price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Segment {
    airline: Option<String>,
    flight_number: Option<String>,
    departure_airport: SegmentAirport,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SegmentAirport {
    time: Option<String>,
}

/// One itinerary, summarized by its first segment.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightOffer {
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub departure_time: Option<String>,
    pub total_duration_minutes: Option<u32>,
    pub price: Option<f64>,
}

impl From<RawOffer> for FlightOffer {
    fn from(offer: RawOffer) -> Self {
        let first = offer.flights.into_iter().next().unwrap_or_default();
        Self {
            airline: first.airline,
            flight_number: first.flight_number,
            departure_time: first.departure_airport.time,
            total_duration_minutes: offer.total_duration,
            price: offer.price,
        }
    }
}

impl FlightOffer {
    fn departs_at(&self) -> Option<NaiveDateTime> {
        self.departure_time
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t.trim(), DEPARTURE_TIME_FORMAT).ok())
    }

    fn render(&self, currency: &str) -> String {
        format!(
            "Flight: {} {}\nDeparture Time: {}\nTotal Duration: {} minutes\nPrice: {} {}",
            or_na(self.airline.as_deref()),
            or_na(self.flight_number.as_deref()),
            or_na(self.departure_time.as_deref()),
            or_na(self.total_duration_minutes),
            or_na(self.price),
            currency
        )
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Offers between two airports, earliest departure first.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightListing {
    pub departure: String,
    pub arrival: String,
    pub currency: String,
    pub offers: Vec<FlightOffer>,
}

impl FlightListing {
    /// Human-readable listing, or the no-flights message when empty.
    pub fn render(&self) -> String {
        if self.offers.is_empty() {
            return format!(
                "No active or scheduled flights found between {} and {} for the current real-time window.",
                self.departure, self.arrival
            );
        }

        let mut blocks = Vec::with_capacity(self.offers.len() + 1);
        blocks.push(format!(
            "--- Active & Scheduled Flights from {} to {} ---",
            self.departure, self.arrival
        ));
        blocks.extend(self.offers.iter().map(|o| o.render(&self.currency)));
        blocks.join("\n---\n")
    }
}

/// Stable sort by departure; offers without a parseable time go last.
fn sort_by_departure(offers: &mut [FlightOffer]) {
    offers.sort_by(|a, b| match (a.departs_at(), b.departs_at()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Searches one-way flights departing today.
pub struct FlightSearch {
    fetcher: Arc<dyn HttpFetcher>,
    endpoint: String,
    api_key: Option<String>,
}

impl FlightSearch {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, endpoint: &str, api_key: Option<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Flights between two IATA codes for today's local date.
    pub async fn search_flights(
        &self,
        departure: &str,
        arrival: &str,
    ) -> Result<FlightListing, ProviderError> {
        self.search_flights_on(departure, arrival, Local::now().date_naive())
            .await
    }

    /// Flights between two IATA codes on `date`.
    #[instrument(skip(self))]
    pub async fn search_flights_on(
        &self,
        departure: &str,
        arrival: &str,
        date: NaiveDate,
    ) -> Result<FlightListing, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Flight search requested without an API key");
            return Err(ProviderError::MissingCredential("MCP_SERPAPI_KEY"));
        };

        let request = ApiRequest::get(&self.endpoint)
            .query("engine", "google_flights")
            .query("departure_id", departure)
            .query("arrival_id", arrival)
            .query("type", 2)
            .query("outbound_date", date.format("%Y-%m-%d"))
            .query("sort_by", 2)
            .query("api_key", api_key);

        let response: SearchResponse = self
            .fetcher
            .get_json(request)
            .await
            .and_then(decode)
            .map_err(|e| {
                warn!(error = %e, "Flight search request failed");
                ProviderError::Flights(e)
            })?;

        let mut offers: Vec<FlightOffer> = response
            .other_flights
            .into_iter()
            .chain(response.best_flights)
            .map(FlightOffer::from)
            .collect();
        sort_by_departure(&mut offers);
        info!("Found {} flight offer(s)", offers.len());

        Ok(FlightListing {
            departure: departure.to_string(),
            arrival: arrival.to_string(),
            currency: response
                .search_parameters
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            offers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::providers::FetchError;
    use crate::domains::providers::client::testing::ScriptedFetcher;
    use serde_json::json;

    const ENDPOINT: &str = "https://serpapi.test/search";

    fn search(fetcher: Arc<ScriptedFetcher>) -> FlightSearch {
        FlightSearch::new(fetcher, ENDPOINT, Some("secret".to_string()))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn offer(airline: &str, number: &str, time: &str) -> serde_json::Value {
        json!({
            "flights": [{
                "airline": airline,
                "flight_number": number,
                "departure_airport": { "id": "TRN", "time": time }
            }],
            "total_duration": 95,
            "price": 120
        })
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(ENDPOINT, json!({})));

        search(fetcher.clone())
            .search_flights_on("TRN", "CDG", date())
            .await
            .unwrap();

        let request = &fetcher.requests()[0];
        assert_eq!(request.query_value("engine"), Some("google_flights"));
        assert_eq!(request.query_value("departure_id"), Some("TRN"));
        assert_eq!(request.query_value("arrival_id"), Some("CDG"));
        assert_eq!(request.query_value("type"), Some("2"));
        assert_eq!(request.query_value("outbound_date"), Some("2026-10-18"));
        assert_eq!(request.query_value("sort_by"), Some("2"));
        assert_eq!(request.query_value("api_key"), Some("secret"));
    }

    #[tokio::test]
    async fn test_no_offers_is_success() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            ENDPOINT,
            json!({ "other_flights": [], "search_parameters": { "currency": "USD" } }),
        ));

        let listing = search(fetcher)
            .search_flights_on("TRN", "CDG", date())
            .await
            .unwrap();

        assert!(listing.offers.is_empty());
        assert_eq!(
            listing.render(),
            "No active or scheduled flights found between TRN and CDG for the current real-time window."
        );
    }

    #[tokio::test]
    async fn test_only_first_segment_is_used() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            ENDPOINT,
            json!({
                "best_flights": [{
                    "flights": [
                        { "airline": "ITA", "flight_number": "AZ 1580",
                          "departure_airport": { "time": "2026-10-18 07:10" } },
                        { "airline": "Air France", "flight_number": "AF 1203",
                          "departure_airport": { "time": "2026-10-18 10:45" } }
                    ],
                    "total_duration": 310,
                    "price": 189
                }]
            }),
        ));

        let listing = search(fetcher)
            .search_flights_on("TRN", "CDG", date())
            .await
            .unwrap();

        let text = listing.render();
        assert_eq!(listing.offers.len(), 1);
        assert!(text.contains("Flight: ITA AZ 1580\nDeparture Time: 2026-10-18 07:10"));
        assert!(text.contains("Total Duration: 310 minutes\nPrice: 189 EUR"));
        assert!(!text.contains("AF 1203"));
        assert!(text.starts_with("--- Active & Scheduled Flights from TRN to CDG ---\n---\n"));
    }

    #[tokio::test]
    async fn test_offers_sorted_by_departure() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(
            ENDPOINT,
            json!({
                "other_flights": [
                    offer("Lufthansa", "LH 100", "2026-10-18 18:30"),
                    offer("Mystery", "XX 1", "soon"),
                    offer("easyJet", "U2 200", "2026-10-18 06:05"),
                ],
                "best_flights": [
                    offer("ITA", "AZ 300", "2026-10-18 12:00"),
                    { "flights": [], "price": 99 },
                ],
                "search_parameters": { "currency": "CHF" }
            }),
        ));

        let listing = search(fetcher)
            .search_flights_on("ZRH", "FCO", date())
            .await
            .unwrap();

        let numbers: Vec<_> = listing
            .offers
            .iter()
            .map(|o| o.flight_number.as_deref())
            .collect();
        assert_eq!(
            numbers,
            vec![Some("U2 200"), Some("AZ 300"), Some("LH 100"), Some("XX 1"), None]
        );
        assert_eq!(listing.currency, "CHF");
        assert!(listing.render().contains("Flight: N/A N/A\nDeparture Time: N/A"));
    }

    #[tokio::test]
    async fn test_status_error_message_names_cause() {
        let fetcher = Arc::new(ScriptedFetcher::new().fail(ENDPOINT, FetchError::Status(401)));

        let err = search(fetcher)
            .search_flights_on("TRN", "CDG", date())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Flights(FetchError::Status(401))));
        assert!(
            err.to_string()
                .starts_with("Unable to fetch flight data due to a network or API error: ")
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_connection_failure_does_not_expose_api_key() {
        use crate::domains::providers::client::ReqwestFetcher;
        use std::time::Duration;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let search = FlightSearch::new(
            Arc::new(ReqwestFetcher::new(Duration::from_secs(2))),
            &format!("http://{addr}/search"),
            Some("TOPSECRETKEY".to_string()),
        );
        let err = search
            .search_flights_on("TRN", "CDG", date())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Flights(_)));
        assert!(!err.to_string().contains("TOPSECRETKEY"));
        let logged = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("Flight search request failed"));
        assert!(!logged.contains("TOPSECRETKEY"));
    }

    #[tokio::test]
    async fn test_missing_key_sends_nothing() {
        let fetcher = Arc::new(ScriptedFetcher::new().respond(ENDPOINT, json!({})));

        let result = FlightSearch::new(fetcher.clone(), ENDPOINT, Some("  ".to_string()))
            .search_flights("TRN", "CDG")
            .await;

        assert!(matches!(
            result,
            Err(ProviderError::MissingCredential("MCP_SERPAPI_KEY"))
        ));
        assert!(fetcher.requests().is_empty());
    }
}
