//! Raw gateway responses

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Response exactly as returned by the gateway
///
/// The status is not interpreted: a 401 or 500 is still a successful call at
/// this layer.
#[derive(Debug)]
pub struct RawResponse {
    inner: reqwest::Response,
}

impl RawResponse {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self { inner: response }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// HTTP status as a typed value
    pub fn status_code(&self) -> StatusCode {
        self.inner.status()
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.inner.status().is_client_error()
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.inner.status().is_server_error()
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Final URL of the response
    pub fn url(&self) -> &reqwest::Url {
        self.inner.url()
    }

    /// Get the response body as text
    pub async fn text(self) -> Result<String> {
        Ok(self.inner.text().await?)
    }

    /// Get the response body as JSON
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Get the response body as bytes
    pub async fn bytes(self) -> Result<Vec<u8>> {
        Ok(self.inner.bytes().await?.to_vec())
    }

    /// Unwrap the transport response
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}
