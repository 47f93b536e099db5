//! Forecast resolution with provider fallback.
//!
//! The National Weather Service is tried first: a `points` lookup yields the
//! grid forecast URL, which is then fetched. Only when the points lookup
//! itself fails is Open-Meteo queried instead. Once the points lookup has
//! succeeded, a failing detail fetch is final.

use serde::Deserialize;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::client::{ApiRequest, HttpFetcher, decode};
use super::error::FetchError;
use super::{Coordinate, ProviderError, null_as_default, nws_request};

/// Number of NWS periods included in a detailed forecast.
pub const MAX_PERIODS: usize = 5;

/// Number of daily entries requested from and rendered for Open-Meteo.
pub const FALLBACK_DAYS: usize = 3;

const OPEN_METEO_CODES_URL: &str = "https://open-meteo.com/en/docs";
const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// NWS records
// ============================================================================

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    forecast: String,
}

#[derive(Debug, Deserialize)]
struct GridForecastResponse {
    properties: GridForecastProperties,
}

#[derive(Debug, Deserialize)]
struct GridForecastProperties {
    periods: Vec<ForecastPeriod>,
}

/// One named NWS forecast period ("Tonight", "Friday", ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastPeriod {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(rename = "temperatureUnit", default, deserialize_with = "null_as_default")]
    pub temperature_unit: String,
    #[serde(rename = "windSpeed", default, deserialize_with = "null_as_default")]
    pub wind_speed: String,
    #[serde(rename = "windDirection", default, deserialize_with = "null_as_default")]
    pub wind_direction: String,
    #[serde(rename = "detailedForecast", default, deserialize_with = "null_as_default")]
    pub detailed_text: String,
}

impl ForecastPeriod {
    fn render(&self) -> String {
        format!(
            "{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}",
            self.name,
            or_na(self.temperature),
            self.temperature_unit,
            self.wind_speed,
            self.wind_direction,
            self.detailed_text
        )
    }
}

// ============================================================================
// Open-Meteo records
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    current_weather: CurrentConditions,
    #[serde(default)]
    daily: DailySeries,
}

/// Current conditions reported by Open-Meteo.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// km/h.
    #[serde(rename = "windspeed")]
    pub wind_speed: Option<f64>,
    /// Degrees.
    #[serde(rename = "winddirection")]
    pub wind_direction: Option<f64>,
    /// WMO weather interpretation code.
    #[serde(rename = "weathercode")]
    pub weather_code: Option<i64>,
}

/// Column-oriented daily block as Open-Meteo sends it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DailySeries {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    weathercode: Vec<Option<i64>>,
}

/// One day of the fallback forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecastPoint {
    pub date: String,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub weather_code: Option<i64>,
}

impl DailySeries {
    /// Rows in supplied order, limited to the shortest column.
    fn into_points(self, limit: usize) -> Vec<DailyForecastPoint> {
        self.time
            .into_iter()
            .zip(self.temperature_2m_max)
            .zip(self.temperature_2m_min)
            .zip(self.weathercode)
            .take(limit)
            .map(|(((date, max), min), code)| DailyForecastPoint {
                date,
                temperature_max: max,
                temperature_min: min,
                weather_code: code,
            })
            .collect()
    }
}

// ============================================================================
// Result
// ============================================================================

/// A forecast from whichever provider answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Forecast {
    /// NWS periods, at most [`MAX_PERIODS`], in provider order.
    Detailed(Vec<ForecastPeriod>),
    /// Open-Meteo current conditions plus daily summary.
    Fallback {
        current: CurrentConditions,
        daily: Vec<DailyForecastPoint>,
    },
}

impl Forecast {
    /// Name of the provider that produced this forecast.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Detailed(_) => "nws",
            Self::Fallback { .. } => "open-meteo",
        }
    }

    /// Human-readable summary.
    pub fn render(&self) -> String {
        match self {
            Self::Detailed(periods) => periods
                .iter()
                .map(ForecastPeriod::render)
                .collect::<Vec<_>>()
                .join("\n---\n"),
            Self::Fallback { current, daily } => {
                let mut text = format!(
                    "Current Weather:\n\
                     Temperature: {}°C\n\
                     Wind: {} km/h from {}°\n\
                     Weather Code: {} (see {} for codes)\n\
                     \n\
                     Next {} Days Forecast:\n",
                    or_na(current.temperature),
                    or_na(current.wind_speed),
                    or_na(current.wind_direction),
                    or_na(current.weather_code),
                    OPEN_METEO_CODES_URL,
                    FALLBACK_DAYS,
                );
                for day in daily {
                    text.push_str(&format!(
                        "{}: High {}°C, Low {}°C, Code {}\n",
                        day.date,
                        or_na(day.temperature_max),
                        or_na(day.temperature_min),
                        or_na(day.weather_code)
                    ));
                }
                text
            }
        }
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves a forecast for a coordinate, preferring the NWS.
pub struct ForecastResolver {
    fetcher: Arc<dyn HttpFetcher>,
    nws_base_url: String,
    open_meteo_base_url: String,
    user_agent: String,
}

impl ForecastResolver {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        nws_base_url: &str,
        open_meteo_base_url: &str,
        user_agent: &str,
    ) -> Self {
        Self {
            fetcher,
            nws_base_url: nws_base_url.trim_end_matches('/').to_string(),
            open_meteo_base_url: open_meteo_base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Forecast for `at`. Each provider is tried at most once.
    #[instrument(skip(self), fields(latitude = at.latitude, longitude = at.longitude))]
    pub async fn forecast(&self, at: Coordinate) -> Result<Forecast, ProviderError> {
        match self.grid_forecast_url(at).await {
            Ok(url) => self.detailed_forecast(url).await,
            Err(e) => {
                warn!(error = %e, "NWS points lookup failed, falling back to Open-Meteo");
                self.fallback_forecast(at).await
            }
        }
    }

    /// Step 1: ask NWS which grid forecast covers the coordinate.
    async fn grid_forecast_url(&self, at: Coordinate) -> Result<String, FetchError> {
        let url = format!(
            "{}/points/{},{}",
            self.nws_base_url, at.latitude, at.longitude
        );
        let points: PointsResponse = self
            .fetcher
            .get_json(nws_request(url, &self.user_agent))
            .await
            .and_then(decode)?;
        Ok(points.properties.forecast)
    }

    /// Step 2: fetch the grid forecast. Failure here does not fall back.
    async fn detailed_forecast(&self, url: String) -> Result<Forecast, ProviderError> {
        let forecast: GridForecastResponse = self
            .fetcher
            .get_json(nws_request(url, &self.user_agent))
            .await
            .and_then(decode)
            .map_err(|e| {
                warn!(error = %e, "NWS detailed forecast request failed");
                ProviderError::DetailedForecast
            })?;

        let periods: Vec<ForecastPeriod> = forecast
            .properties
            .periods
            .into_iter()
            .take(MAX_PERIODS)
            .collect();
        info!("NWS forecast with {} period(s)", periods.len());
        Ok(Forecast::Detailed(periods))
    }

    /// Secondary provider: Open-Meteo current conditions and daily summary.
    async fn fallback_forecast(&self, at: Coordinate) -> Result<Forecast, ProviderError> {
        let request = ApiRequest::get(format!("{}/forecast", self.open_meteo_base_url))
            .query("latitude", at.latitude)
            .query("longitude", at.longitude)
            .query("current_weather", "true")
            .query("daily", "temperature_2m_max,temperature_2m_min,weathercode")
            .query("timezone", "auto")
            .query("forecast_days", FALLBACK_DAYS);

        let response: OpenMeteoResponse = self
            .fetcher
            .get_json(request)
            .await
            .and_then(decode)
            .map_err(|e| {
                warn!(error = %e, "Open-Meteo request failed");
                ProviderError::NoForecastProvider
            })?;

        let daily = response.daily.into_points(FALLBACK_DAYS);
        info!("Open-Meteo forecast with {} day(s)", daily.len());
        Ok(Forecast::Fallback {
            current: response.current_weather,
            daily,
        })
    }
}
