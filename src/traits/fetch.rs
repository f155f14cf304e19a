//! Resource fetcher trait abstraction.
//!
//! Provides a trait-based abstraction for the cluster's REST API,
//! enabling dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Response from a resource fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl FetchResponse {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Parse the response body as a JSON value, or `None` if the body is
    /// not JSON. Unparseable bodies are logged and treated as absent so
    /// downstream normalization falls back to default-valued models.
    pub fn json_value(&self) -> Option<Value> {
        match serde_json::from_slice(&self.body) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(status = self.status, error = %err, "response body is not JSON");
                None
            }
        }
    }

    /// Classify the response and decode its body.
    ///
    /// Non-2xx statuses become [`FetchError::Status`] carrying the start
    /// of the body as the message. Successful responses decode to JSON;
    /// a non-JSON body collapses to `Value::Null` so callers fall back
    /// to default-valued models.
    pub fn into_value(self) -> Result<Value, FetchError> {
        if !self.is_success() {
            let text = String::from_utf8_lossy(&self.body);
            let mut message: String = text.trim().chars().take(200).collect();
            if message.is_empty() {
                message = "request failed".to_string();
            }
            return Err(FetchError::Status {
                status: self.status,
                message,
            });
        }
        Ok(self.json_value().unwrap_or(Value::Null))
    }
}

/// Resource fetch errors.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
    /// Server returned an error status
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },
    /// Request was cancelled
    #[error("Request cancelled")]
    Cancelled,
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Other error
    #[error("Fetch error: {0}")]
    Other(String),
}

/// Trait for fetching cluster REST resources.
///
/// This trait abstracts HTTP operations to enable dependency injection
/// and mocking in tests. Implementations include the production
/// reqwest-based fetcher and a mock fetcher for testing. The cluster API
/// is read-mostly: everything is a GET except a handful of PATCH updates
/// (job status, node pause, scheduler pause).
///
/// # Example
///
/// ```ignore
/// use smelterdeck::traits::{ResourceFetcher, Headers, FetchResponse, FetchError};
///
/// async fn fetch_status<F: ResourceFetcher>(fetcher: &F) -> Result<String, FetchError> {
///     let response = fetcher.get("http://smelter/api/v4/status/", &Headers::new()).await?;
///     response.text().map_err(|e| FetchError::Other(e.to_string()))
/// }
/// ```
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Perform a GET request.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `headers` - Request headers
    ///
    /// # Returns
    /// The response or an error
    async fn get(&self, url: &str, headers: &Headers) -> Result<FetchResponse, FetchError>;

    /// Perform a PATCH request with a JSON body.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Request body as a string
    /// * `headers` - Request headers
    ///
    /// # Returns
    /// The response or an error
    async fn patch(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<FetchResponse, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_new() {
        let response = FetchResponse::new(200, Bytes::from("Hello"));
        assert_eq!(response.status, 200);
        assert!(response.headers.is_empty());
        assert_eq!(response.body, Bytes::from("Hello"));
    }

    #[test]
    fn test_response_with_headers() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let response = FetchResponse::with_headers(200, headers, Bytes::from("{}"));
        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_response_is_success() {
        assert!(FetchResponse::new(200, Bytes::new()).is_success());
        assert!(FetchResponse::new(201, Bytes::new()).is_success());
        assert!(FetchResponse::new(204, Bytes::new()).is_success());
        assert!(FetchResponse::new(299, Bytes::new()).is_success());
        assert!(!FetchResponse::new(300, Bytes::new()).is_success());
        assert!(!FetchResponse::new(400, Bytes::new()).is_success());
        assert!(!FetchResponse::new(500, Bytes::new()).is_success());
    }

    #[test]
    fn test_response_text() {
        let response = FetchResponse::new(200, Bytes::from("Hello, World!"));
        assert_eq!(response.text().unwrap(), "Hello, World!");
    }

    #[test]
    fn test_response_json() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct TestData {
            name: String,
            value: i32,
        }

        let response = FetchResponse::new(200, Bytes::from(r#"{"name":"test","value":42}"#));
        let data: TestData = response.json().unwrap();
        assert_eq!(
            data,
            TestData {
                name: "test".to_string(),
                value: 42
            }
        );
    }

    #[test]
    fn test_response_json_value() {
        let response = FetchResponse::new(200, Bytes::from(r#"{"count": 3}"#));
        let value = response.json_value().unwrap();
        assert_eq!(value["count"], 3);
    }

    #[test]
    fn test_response_json_value_not_json() {
        let response = FetchResponse::new(200, Bytes::from("<html>proxy error</html>"));
        assert!(response.json_value().is_none());
    }

    #[test]
    fn test_into_value_success() {
        let response = FetchResponse::new(200, Bytes::from(r#"{"count": 3}"#));
        assert_eq!(response.into_value().unwrap()["count"], 3);
    }

    #[test]
    fn test_into_value_non_json_body_degrades_to_null() {
        let response = FetchResponse::new(200, Bytes::from("<html>proxy error</html>"));
        assert_eq!(response.into_value().unwrap(), Value::Null);
    }

    #[test]
    fn test_into_value_error_status() {
        let response = FetchResponse::new(503, Bytes::from("scheduler unavailable"));
        match response.into_value() {
            Err(FetchError::Status { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "scheduler unavailable");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_value_error_status_empty_body() {
        let response = FetchResponse::new(500, Bytes::new());
        match response.into_value() {
            Err(FetchError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "request failed");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(
            FetchError::ConnectionFailed("timeout".to_string()).to_string(),
            "Connection failed: timeout"
        );
        assert_eq!(
            FetchError::Timeout("30s".to_string()).to_string(),
            "Request timeout: 30s"
        );
        assert_eq!(
            FetchError::Status {
                status: 500,
                message: "Internal Error".to_string()
            }
            .to_string(),
            "Server error (500): Internal Error"
        );
        assert_eq!(FetchError::Cancelled.to_string(), "Request cancelled");
        assert_eq!(
            FetchError::InvalidUrl("bad url".to_string()).to_string(),
            "Invalid URL: bad url"
        );
        assert_eq!(
            FetchError::Other("unknown".to_string()).to_string(),
            "Fetch error: unknown"
        );
    }

    #[test]
    fn test_fetch_error_clone() {
        let err = FetchError::ConnectionFailed("test".to_string());
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
