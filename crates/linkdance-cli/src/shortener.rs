//! URL shortening client
//!
//! Shortens view URLs through a cleanuri-compatible HTTP API: a form POST of
//! `url=<long url>` answered with `{"result_url": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use linkdance_core::{ShortenError, Shortener};

/// Request timeout in seconds
const SHORTEN_TIMEOUT: u64 = 10;

#[derive(Debug, Deserialize)]
struct ShortenResponse {
    result_url: Option<String>,
    error: Option<String>,
}

/// Shortener backed by an HTTP service
pub struct CleanUriShortener {
    client: reqwest::Client,
    endpoint: String,
}

impl CleanUriShortener {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ShortenError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SHORTEN_TIMEOUT))
            .user_agent(concat!("linkdance/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShortenError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Shortener for CleanUriShortener {
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("url", long_url)])
            .send()
            .await
            .map_err(|e| ShortenError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShortenError::Service(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ShortenError::Network(e.to_string()))?;
        parse_response(&body)
    }
}

/// Extract the short URL from a service response body
fn parse_response(body: &str) -> Result<String, ShortenError> {
    let parsed: ShortenResponse = serde_json::from_str(body)
        .map_err(|e| ShortenError::Service(format!("Unreadable response: {}", e)))?;

    if let Some(error) = parsed.error {
        return Err(ShortenError::Service(error));
    }

    parsed
        .result_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ShortenError::Service("Response has no result_url".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_result_url() {
        let body = r#"{"result_url":"https:\/\/cleanuri.com\/abc123"}"#;
        assert_eq!(parse_response(body).unwrap(), "https://cleanuri.com/abc123");
    }

    #[test]
    fn test_parse_service_error() {
        let body = r#"{"error":"API Error: URL is empty"}"#;
        assert_eq!(
            parse_response(body),
            Err(ShortenError::Service("API Error: URL is empty".to_string()))
        );
    }

    #[test]
    fn test_parse_missing_or_empty_result() {
        assert!(matches!(parse_response("{}"), Err(ShortenError::Service(_))));
        assert!(matches!(
            parse_response(r#"{"result_url":""}"#),
            Err(ShortenError::Service(_))
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_response("<html>502</html>"),
            Err(ShortenError::Service(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Port 9 on loopback: connection refused without touching the network
        let shortener = CleanUriShortener::new("http://127.0.0.1:9/shorten").unwrap();
        let result = shortener.shorten("http://localhost:8080/view?data=e30=").await;
        assert!(matches!(result, Err(ShortenError::Network(_))));
    }
}
