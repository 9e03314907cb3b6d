//! # HTTP Client Utilities
//!
//! Shared HTTP client wrapper for the upstream adapters.
//!
//! Provides configurable timeouts, JSON deserialization, and mapping of
//! transport and status failures onto [`SourceError`].
//!
//! # Examples
//!
//! ```ignore
//! use country_cache::infrastructure::sources::http_client::HttpClient;
//!
//! let client = HttpClient::new("restcountries", 5000)?;
//! let response: Vec<serde_json::Value> = client.get("https://restcountries.com/v2/all").await?;
//! ```

use crate::infrastructure::sources::error::{SourceError, SourceResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper bound to one named upstream.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Upstream name used in errors and logs.
    upstream: String,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::SourceUnavailable` if the client cannot be created.
    pub fn new(upstream: impl Into<String>, timeout_ms: u64) -> SourceResult<Self> {
        let upstream = upstream.into();
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                SourceError::unavailable(&upstream, format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, upstream })
    }

    /// Returns the upstream name.
    #[inline]
    #[must_use]
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::SourceUnavailable` if the request fails or the
    /// status is not a success.
    /// Returns `SourceError::MalformedResponse` if the body cannot be parsed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a GET request with query parameters and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> SourceResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> SourceResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| self.map_reqwest_error(e))?;
            serde_json::from_slice::<T>(&body).map_err(|e| {
                SourceError::malformed(&self.upstream, format!("failed to parse response: {}", e))
            })
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(SourceError::status(
                &self.upstream,
                status.as_u16(),
                format!("HTTP error ({}): {}", status, truncate(&error_body, 200)),
            ))
        }
    }

    /// Maps a reqwest error to a SourceError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> SourceError {
        if error.is_timeout() {
            SourceError::timeout(&self.upstream)
        } else if error.is_connect() {
            SourceError::unavailable(&self.upstream, format!("connection failed: {}", error))
        } else {
            SourceError::unavailable(&self.upstream, format!("HTTP request failed: {}", error))
        }
    }
}

/// Cuts an error body down to at most `max` characters.
fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
