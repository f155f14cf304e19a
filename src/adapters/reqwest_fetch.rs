//! Reqwest-based resource fetcher adapter.
//!
//! This module provides the production fetcher implementation using reqwest,
//! implementing the [`ResourceFetcher`] trait from `crate::traits`.

use async_trait::async_trait;

use crate::traits::{FetchError, FetchResponse, Headers, ResourceFetcher};

/// Resource fetcher implementation using reqwest.
///
/// This adapter wraps a `reqwest::Client` and implements the
/// [`ResourceFetcher`] trait, providing the GET and PATCH operations the
/// cluster API consumes.
///
/// # Example
///
/// ```ignore
/// use smelterdeck::adapters::ReqwestFetcher;
/// use smelterdeck::traits::ResourceFetcher;
///
/// let fetcher = ReqwestFetcher::new();
/// let response = fetcher.get("http://smelter/api/v4/status/", &Headers::new()).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Create a new ReqwestFetcher with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestFetcher with a custom reqwest::Client.
    ///
    /// This allows for advanced configuration like custom timeouts,
    /// connection pools, or TLS settings.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to FetchError.
    fn convert_error(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_connect() {
            FetchError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            FetchError::InvalidUrl(err.to_string())
        } else {
            FetchError::Other(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, headers: &Headers) -> Result<FetchResponse, FetchError> {
        let builder = self.client.get(url);
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(FetchResponse::with_headers(status, response_headers, body))
    }

    async fn patch(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<FetchResponse, FetchError> {
        let builder = self
            .client
            .patch(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(FetchResponse::with_headers(status, response_headers, body))
    }
}
