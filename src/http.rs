//! Shared HTTP client construction.

use crate::error::{DocvoxError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default timeout for remote requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an HTTP client with the default timeout.
pub fn create_client() -> Result<reqwest::Client> {
    create_client_with_timeout(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
}

/// Create an HTTP client with a custom timeout. `None` waits indefinitely.
pub fn create_client_with_timeout(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| DocvoxError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Translate a configured timeout in seconds, where 0 means no timeout.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Read a response, turning non-success statuses into a remote-service error
/// that carries the body text.
pub(crate) async fn check_status(
    operation: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DocvoxError::status(operation, status.as_u16(), &body))
}

/// Check the status and decode a JSON body into `T`. Shape mismatches (missing
/// or mistyped fields) become remote-service errors naming the field.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> Result<T> {
    let response = check_status(operation, response).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| DocvoxError::transport(operation, e))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        DocvoxError::malformed(operation, format!("unexpected response shape: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_disables() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(30), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_client_creation() {
        assert!(create_client().is_ok());
        assert!(create_client_with_timeout(None).is_ok());
    }
}
