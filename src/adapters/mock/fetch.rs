//! Mock resource fetcher for testing.
//!
//! Provides a configurable mock fetcher that can return predefined
//! responses or errors for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{FetchError, FetchResponse, Headers, ResourceFetcher};

/// A recorded request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or PATCH)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for PATCH requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful response
    Success(FetchResponse),
    /// Return an error
    Error(FetchError),
}

/// Mock resource fetcher for testing.
///
/// This fetcher can be configured to return specific responses for URLs,
/// allowing tests to verify API interactions without network access.
///
/// # Example
///
/// ```ignore
/// use smelterdeck::adapters::mock::{MockFetcher, MockResponse};
/// use smelterdeck::traits::{ResourceFetcher, FetchResponse, Headers};
/// use bytes::Bytes;
///
/// let fetcher = MockFetcher::new();
///
/// // Configure a response
/// fetcher.set_response(
///     "http://smelter/api/v4/status/",
///     MockResponse::Success(FetchResponse::new(200, Bytes::from("{}")))
/// );
///
/// // Make a request
/// let response = fetcher.get("http://smelter/api/v4/status/", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
///
/// // Verify the request was made
/// let requests = fetcher.get_requests();
/// assert_eq!(requests.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockFetcher {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a specific URL.
    ///
    /// The URL is matched exactly first, then by prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        self.responses.lock().unwrap().clear();
    }

    /// Record a request.
    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    /// Get the response for a URL.
    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        // First try exact match
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        // Then try prefix match (for URL patterns)
        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        // Finally use default
        let default = self.default_response.lock().unwrap();
        default.clone()
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceFetcher for MockFetcher {
    async fn get(&self, url: &str, headers: &Headers) -> Result<FetchResponse, FetchError> {
        self.record_request("GET", url, headers, None);

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(FetchError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    async fn patch(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<FetchResponse, FetchError> {
        self.record_request("PATCH", url, headers, Some(body.to_string()));

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(FetchError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_mock_fetcher_new() {
        let fetcher = MockFetcher::new();
        assert!(fetcher.get_requests().is_empty());
    }

    #[test]
    fn test_mock_fetcher_default() {
        let fetcher = MockFetcher::default();
        assert!(fetcher.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_with_response() {
        let fetcher = MockFetcher::new();
        fetcher.set_response(
            "http://smelter/api/v4/status/",
            MockResponse::Success(FetchResponse::new(200, Bytes::from("Hello"))),
        );

        let response = fetcher
            .get("http://smelter/api/v4/status/", &Headers::new())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, Bytes::from("Hello"));

        let requests = fetcher.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, "http://smelter/api/v4/status/");
    }

    #[tokio::test]
    async fn test_get_with_error() {
        let fetcher = MockFetcher::new();
        fetcher.set_response(
            "http://smelter/api/v4/jobs/",
            MockResponse::Error(FetchError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            }),
        );

        let result = fetcher.get("http://smelter/api/v4/jobs/", &Headers::new()).await;

        assert!(result.is_err());
        match result {
            Err(FetchError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            _ => panic!("Expected Status error"),
        }
    }

    #[tokio::test]
    async fn test_patch_with_response() {
        let fetcher = MockFetcher::new();
        fetcher.set_response(
            "http://smelter/api/v4/scheduler/",
            MockResponse::Success(FetchResponse::new(200, Bytes::from(r#"{"is_paused": true}"#))),
        );

        let response = fetcher
            .patch(
                "http://smelter/api/v4/scheduler/",
                r#"{"is_paused": true}"#,
                &Headers::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 200);

        let requests = fetcher.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "PATCH");
        assert_eq!(requests[0].body, Some(r#"{"is_paused": true}"#.to_string()));
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let fetcher = MockFetcher::new();

        let result = fetcher
            .get("http://smelter/api/v4/missing/", &Headers::new())
            .await;

        assert!(result.is_err());
        assert!(matches!(result, Err(FetchError::Other(_))));
    }

    #[tokio::test]
    async fn test_default_response() {
        let fetcher = MockFetcher::new();
        fetcher.set_default_response(MockResponse::Success(FetchResponse::new(
            404,
            Bytes::from("Not Found"),
        )));

        let response = fetcher
            .get("http://smelter/api/v4/anything/", &Headers::new())
            .await
            .unwrap();

        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_headers_recorded() {
        let fetcher = MockFetcher::new();
        fetcher.set_response(
            "http://smelter/api/v4/jobs/",
            MockResponse::Success(FetchResponse::new(200, Bytes::new())),
        );

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer token123".to_string());

        fetcher
            .get("http://smelter/api/v4/jobs/", &headers)
            .await
            .unwrap();

        let requests = fetcher.get_requests();
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"Bearer token123".to_string())
        );
    }

    #[test]
    fn test_clear_requests() {
        let fetcher = MockFetcher::new();
        fetcher.record_request("GET", "http://smelter/api", &Headers::new(), None);
        assert_eq!(fetcher.get_requests().len(), 1);

        fetcher.clear_requests();
        assert!(fetcher.get_requests().is_empty());
    }

    #[test]
    fn test_clear_responses() {
        let fetcher = MockFetcher::new();
        fetcher.set_response(
            "http://smelter/api",
            MockResponse::Success(FetchResponse::new(200, Bytes::new())),
        );

        fetcher.clear_responses();

        // After clearing, the response should not be found
        assert!(fetcher.get_response("http://smelter/api").is_none());
    }

    #[tokio::test]
    async fn test_prefix_match() {
        let fetcher = MockFetcher::new();
        fetcher.set_response(
            "http://smelter/api/v4/jobs/",
            MockResponse::Success(FetchResponse::new(200, Bytes::from("jobs page"))),
        );

        let response = fetcher
            .get(
                "http://smelter/api/v4/jobs/?page=1&page_size=25",
                &Headers::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_clone() {
        let fetcher = MockFetcher::new();
        fetcher.set_response(
            "http://smelter/api",
            MockResponse::Success(FetchResponse::new(200, Bytes::from("Hello"))),
        );

        let cloned = fetcher.clone();

        let response = cloned.get("http://smelter/api", &Headers::new()).await.unwrap();

        assert_eq!(response.status, 200);

        // Both should share the same recorded requests
        assert_eq!(fetcher.get_requests().len(), 1);
        assert_eq!(cloned.get_requests().len(), 1);
    }
}
