//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that is
//! populated once at startup from environment variables (and an optional
//! `.env` file) and then shared read-only with every component.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Default identification string sent to the weather services.
pub const DEFAULT_USER_AGENT: &str = "weather-app/1.0";

/// Default contact address embedded in the geocoding User-Agent.
pub const DEFAULT_CONTACT_EMAIL: &str = "contact@example.com";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Upstream provider endpoints and client settings.
    pub providers: ProvidersConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// SerpApi key used by the flight search.
    /// Get a key at: https://serpapi.com/manage-api-key
    pub serpapi_api_key: Option<String>,

    /// Contact address Nominatim asks clients to include in their User-Agent.
    pub contact_email: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "serpapi_api_key",
                &self.serpapi_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("contact_email", &self.contact_email)
            .finish()
    }
}

/// Endpoints of the upstream providers and shared HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// National Weather Service API base URL.
    pub nws_base_url: String,

    /// Open-Meteo API base URL (forecast fallback).
    pub open_meteo_base_url: String,

    /// IP geolocation endpoint.
    pub ip_location_url: String,

    /// Nominatim search endpoint.
    pub geocode_url: String,

    /// SerpApi search endpoint.
    pub flights_url: String,

    /// User-Agent sent to the weather services.
    pub user_agent: String,

    /// Timeout applied to every outbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            serpapi_api_key: None,
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            nws_base_url: "https://api.weather.gov".to_string(),
            open_meteo_base_url: "https://api.open-meteo.com/v1".to_string(),
            ip_location_url: "http://ip-api.com/json/".to_string(),
            geocode_url: "https://nominatim.openstreetmap.org/search".to_string(),
            flights_url: "https://serpapi.com/search".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ProvidersConfig {
    /// User-Agent for Nominatim, which requires a contact address.
    pub fn geocode_user_agent(&self, contact_email: &str) -> String {
        format!("{} ({})", self.user_agent, contact_email)
    }

    fn endpoints(&self) -> [(&'static str, &str); 5] {
        [
            ("nws_base_url", self.nws_base_url.as_str()),
            ("open_meteo_base_url", self.open_meteo_base_url.as_str()),
            ("ip_location_url", self.ip_location_url.as_str()),
            ("geocode_url", self.geocode_url.as_str()),
            ("flights_url", self.flights_url.as_str()),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

/// Read `primary`, falling back to the unprefixed `legacy` variable.
fn env_with_fallback(primary: &str, legacy: &str) -> Option<String> {
    std::env::var(primary)
        .or_else(|_| std::env::var(legacy))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// `local` is the `--local` command-line flag; it forces the STDIO
    /// transport regardless of `MCP_TRANSPORT`.
    pub fn from_env(local: bool) -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env(local);

        config.credentials.serpapi_api_key = env_with_fallback("MCP_SERPAPI_KEY", "SERPAPI_KEY");

        if let Some(email) = env_with_fallback("MCP_CONTACT_EMAIL", "CONTACT_EMAIL") {
            config.credentials.contact_email = email;
        }

        let providers = &mut config.providers;
        for (var, target) in [
            ("MCP_NWS_BASE_URL", &mut providers.nws_base_url),
            ("MCP_OPEN_METEO_BASE_URL", &mut providers.open_meteo_base_url),
            ("MCP_IP_LOCATION_URL", &mut providers.ip_location_url),
            ("MCP_GEOCODE_URL", &mut providers.geocode_url),
            ("MCP_FLIGHTS_URL", &mut providers.flights_url),
        ] {
            if let Ok(url) = std::env::var(var) {
                *target = url;
            }
        }

        if let Ok(timeout) = std::env::var("MCP_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.trim().parse() {
                providers.request_timeout_secs = secs;
            }
        }

        config
    }

    /// Check the configuration before any component is built.
    pub fn validate(&self) -> Result<()> {
        if self.providers.request_timeout_secs == 0 {
            return Err(Error::config("request timeout must be greater than zero"));
        }

        for (field, value) in self.providers.endpoints() {
            let url = reqwest::Url::parse(value)
                .map_err(|e| Error::config(format!("{field} is not a valid URL ({value}): {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::config(format!(
                    "{field} must use http or https, got {}",
                    url.scheme()
                )));
            }
        }

        Ok(())
    }
}
