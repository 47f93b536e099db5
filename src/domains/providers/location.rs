//! Caller location lookup via ip-api.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{instrument, warn};

use super::client::{ApiRequest, HttpFetcher, decode};
use super::{ProviderError, null_as_default};

#[derive(Debug, Deserialize)]
struct IpLocation {
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Resolves the caller's approximate city from its public IP address.
pub struct LocationResolver {
    fetcher: Arc<dyn HttpFetcher>,
    endpoint: String,
}

impl LocationResolver {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, endpoint: &str) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.to_string(),
        }
    }

    /// The city the service associates with our outbound address.
    #[instrument(skip(self))]
    pub async fn current_location(&self) -> Result<String, ProviderError> {
        let location: IpLocation = self
            .fetcher
            .get_json(ApiRequest::get(&self.endpoint))
            .await
            .and_then(decode)
            .map_err(|e| {
                warn!(error = %e, "IP location request failed");
                ProviderError::Location
            })?;

        if location.status != "success" {
            warn!(
                status = %location.status,
                reason = location.message.as_deref().unwrap_or_default(),
                "IP location lookup unsuccessful"
            );
            return Err(ProviderError::Location);
        }

        location
            .city
            .filter(|city| !city.trim().is_empty())
            .ok_or_else(|| {
                warn!("IP location response has no city");
                ProviderError::Location
            })
    }
}
