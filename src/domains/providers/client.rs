//! Outbound HTTP client seam.
//!
//! Components describe a request as an [`ApiRequest`] and hand it to an
//! [`HttpFetcher`]. The production fetcher builds a fresh reqwest client for
//! every call, so nothing is shared between concurrent tool invocations.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::error::FetchError;

/// A single JSON GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Start a GET request to `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a request header.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Look up a query parameter by key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header by name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Performs JSON GET requests against upstream providers.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Send the request and return the decoded JSON body.
    ///
    /// Non-success statuses, timeouts and undecodable bodies are all errors.
    async fn get_json(&self, request: ApiRequest) -> Result<serde_json::Value, FetchError>;
}

/// Deserialize a JSON body into a typed response record.
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, FetchError> {
    Ok(serde_json::from_value(value)?)
}

/// reqwest-backed fetcher with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get_json(&self, request: ApiRequest) -> Result<serde_json::Value, FetchError> {
        // The client lives for exactly one request
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        debug!(url = %request.url, params = request.query.len(), "Sending provider request");

        let mut builder = client.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(url = %request.url, %status, "Provider returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_builder() {
        let request = ApiRequest::get("https://example.test/search")
            .query("q", "Turin")
            .query("limit", 1)
            .header("User-Agent", "weather-app/1.0");

        assert_eq!(request.query_value("q"), Some("Turin"));
        assert_eq!(request.query_value("limit"), Some("1"));
        assert_eq!(request.header_value("user-agent"), Some("weather-app/1.0"));
        assert_eq!(request.query_value("missing"), None);
    }

    #[test]
    fn test_decode_reports_shape_errors() {
        #[derive(Debug, serde::Deserialize)]
        struct Shape {
            #[allow(dead_code)]
            features: Vec<serde_json::Value>,
        }

        let result = decode::<Shape>(serde_json::json!({ "type": "FeatureCollection" }));
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[cfg(feature = "http")]
    mod reqwest_fetcher {
        use crate::domains::providers::client::{ApiRequest, HttpFetcher, ReqwestFetcher};
        use crate::domains::providers::error::FetchError;
        use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::get};
        use std::time::Duration;

        async fn spawn_upstream() -> String {
            let app = Router::new()
                .route(
                    "/echo",
                    get(|headers: HeaderMap| async move {
                        let agent = headers
                            .get("user-agent")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        Json(serde_json::json!({ "user_agent": agent }))
                    }),
                )
                .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
                .route("/text", get(|| async { "not json" }))
                .route(
                    "/slow",
                    get(|| async {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        Json(serde_json::json!({}))
                    }),
                );

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{}", addr)
        }

        #[tokio::test]
        async fn test_forwards_headers_and_decodes_json() {
            let base = spawn_upstream().await;
            let fetcher = ReqwestFetcher::new(Duration::from_secs(5));

            let body = fetcher
                .get_json(ApiRequest::get(format!("{base}/echo")).header("User-Agent", "weather-app/1.0"))
                .await
                .unwrap();

            assert_eq!(body["user_agent"], "weather-app/1.0");
        }

        #[tokio::test]
        async fn test_non_success_status_is_error() {
            let base = spawn_upstream().await;
            let fetcher = ReqwestFetcher::new(Duration::from_secs(5));

            let result = fetcher.get_json(ApiRequest::get(format!("{base}/missing"))).await;
            assert_eq!(result, Err(FetchError::Status(404)));
        }

        #[tokio::test]
        async fn test_non_json_body_is_decode_error() {
            let base = spawn_upstream().await;
            let fetcher = ReqwestFetcher::new(Duration::from_secs(5));

            let result = fetcher.get_json(ApiRequest::get(format!("{base}/text"))).await;
            assert!(matches!(result, Err(FetchError::Decode(_))));
        }

        #[tokio::test]
        async fn test_timeout_is_reported() {
            let base = spawn_upstream().await;
            let fetcher = ReqwestFetcher::new(Duration::from_millis(200));

            let result = fetcher.get_json(ApiRequest::get(format!("{base}/slow"))).await;
            assert_eq!(result, Err(FetchError::Timeout));
        }

        #[tokio::test]
        async fn test_unreachable_provider_is_error() {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let fetcher = ReqwestFetcher::new(Duration::from_secs(5));
            let result = fetcher.get_json(ApiRequest::get(format!("http://{addr}/"))).await;
            assert!(result.is_err());
        }
    }
}
