//! Transport: one POST to the messages endpoint.
//!
//! Exactly one attempt is made. A non-success status is terminal for the
//! analysis; the body is searched for the vendor's `error.message` and that
//! text is surfaced verbatim, else `HTTP <status>`.

use crate::config::{AnalysisConfig, API_KEY_ENV};
use crate::error::SummaryError;
use crate::pipeline::request::MessagesRequest;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// A successful (2xx) response, body not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Send `request` once.
pub async fn send(
    client: &reqwest::Client,
    request: &MessagesRequest,
    config: &AnalysisConfig,
) -> Result<RawResponse, SummaryError> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or(SummaryError::ApiKeyMissing { var: API_KEY_ENV })?;

    let mut builder = client
        .post(&config.endpoint)
        .header(CONTENT_TYPE, "application/json")
        .header("x-api-key", api_key)
        .header("anthropic-version", &config.api_version)
        .json(request);
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }

    let start = Instant::now();
    let response = builder.send().await.map_err(transport_error)?;
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    debug!(
        "POST {} → {} ({} bytes, {:?})",
        config.endpoint,
        status,
        body.len(),
        start.elapsed()
    );

    if !status.is_success() {
        let message = api_error_message(status.as_u16(), &body);
        warn!("API call failed with {}: {}", status, message);
        return Err(SummaryError::NetworkOrApi {
            status: Some(status.as_u16()),
            message,
        });
    }

    Ok(RawResponse {
        status: status.as_u16(),
        body,
    })
}

/// Message to show for a non-success response.
pub fn api_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

fn transport_error(e: reqwest::Error) -> SummaryError {
    let message = if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Could not reach the API: {e}")
    } else {
        format!("Network error: {e}")
    };
    warn!("{}", message);
    SummaryError::NetworkOrApi {
        status: e.status().map(|s| s.as_u16()),
        message,
    }
}
