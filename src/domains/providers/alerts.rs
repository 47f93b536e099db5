//! Active weather alerts from the National Weather Service.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::client::{HttpFetcher, decode};
use super::{ProviderError, nws_request};

/// Shown when the region has no active alerts.
pub const NO_ACTIVE_ALERTS: &str = "No active alerts for this state.";

const UNKNOWN: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description available";
const NO_INSTRUCTIONS: &str = "No specific instructions provided";

/// One active alert. Absent fields are replaced by placeholders on decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "AlertProperties")]
pub struct Alert {
    pub event: String,
    pub area: String,
    pub severity: String,
    pub description: String,
    pub instructions: String,
}

impl Alert {
    /// Fixed-field text block for this alert.
    pub fn render(&self) -> String {
        format!(
            "Event: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}",
            self.event, self.area, self.severity, self.description, self.instructions
        )
    }
}

impl Default for Alert {
    fn default() -> Self {
        AlertProperties::default().into()
    }
}

/// The `properties` object of an alert feature, as sent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AlertProperties {
    event: Option<String>,
    #[serde(rename = "areaDesc")]
    area_desc: Option<String>,
    severity: Option<String>,
    description: Option<String>,
    instruction: Option<String>,
}

impl From<AlertProperties> for Alert {
    fn from(props: AlertProperties) -> Self {
        let or = |value: Option<String>, placeholder: &str| {
            value.unwrap_or_else(|| placeholder.to_string())
        };
        Self {
            event: or(props.event, UNKNOWN),
            area: or(props.area_desc, UNKNOWN),
            severity: or(props.severity, UNKNOWN),
            description: or(props.description, NO_DESCRIPTION),
            instructions: or(props.instruction, NO_INSTRUCTIONS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlertCollection {
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    #[serde(default)]
    properties: Alert,
}

/// Render alerts as text blocks separated by `---` lines.
pub fn render_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return NO_ACTIVE_ALERTS.to_string();
    }
    alerts
        .iter()
        .map(Alert::render)
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Fetches active alerts for a region code.
pub struct AlertFetcher {
    fetcher: Arc<dyn HttpFetcher>,
    base_url: String,
    user_agent: String,
}

impl AlertFetcher {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, base_url: &str, user_agent: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Active alerts for `region_code` (e.g. "CA"). The code is passed
    /// through unvalidated; an empty list is a successful result.
    #[instrument(skip(self))]
    pub async fn alerts_for_region(&self, region_code: &str) -> Result<Vec<Alert>, ProviderError> {
        let url = format!("{}/alerts/active/area/{}", self.base_url, region_code);

        let collection: AlertCollection = self
            .fetcher
            .get_json(nws_request(url, &self.user_agent))
            .await
            .and_then(decode)
            .map_err(|e| {
                warn!(error = %e, "Alert request failed");
                ProviderError::Alerts
            })?;

        let alerts: Vec<Alert> = collection.features.into_iter().map(|f| f.properties).collect();
        info!("Fetched {} active alert(s)", alerts.len());
        Ok(alerts)
    }
}
