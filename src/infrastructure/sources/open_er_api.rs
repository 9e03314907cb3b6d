//! # Open Exchange Rates Adapter
//!
//! [`ExchangeRateSource`] backed by an Open ER API style endpoint.
//!
//! Each currency is looked up with its own request, `GET {base_url}/{CODE}`,
//! answering `{"result": "success", "base_code": "CODE", "rates": {...}}`.
//! The rate kept for `CODE` is `rates[base_currency]`, the base-currency value
//! of one unit of `CODE`. Requests run concurrently, bounded by
//! `max_concurrent_requests`, so the number of calls equals the number of
//! unique codes rather than the number of countries.

use crate::domain::value_objects::CurrencyCode;
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::http_client::HttpClient;
use crate::infrastructure::sources::traits::{ExchangeRateSource, RateTable};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Upstream name used in errors and logs.
pub const UPSTREAM: &str = "open-er-api";

/// Default bound on in-flight rate requests.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 16;

#[derive(Debug, Deserialize)]
struct LatestRatesDto {
    result: String,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Open ER API adapter.
#[derive(Debug, Clone)]
pub struct OpenErApiSource {
    client: HttpClient,
    base_url: String,
    base_currency: CurrencyCode,
    max_concurrent_requests: usize,
}

impl OpenErApiSource {
    /// Creates an adapter for the given endpoint and base currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        base_url: impl Into<String>,
        base_currency: CurrencyCode,
        timeout_ms: u64,
    ) -> SourceResult<Self> {
        Ok(Self {
            client: HttpClient::new(UPSTREAM, timeout_ms)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            base_currency,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        })
    }

    /// Sets the bound on in-flight requests. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max.max(1);
        self
    }

    /// Fetches the rate of one currency.
    ///
    /// Returns `Ok(None)` when the upstream answered but has no usable rate
    /// for the code (client error status such as 404, failure result,
    /// missing or non-positive base entry, unparseable body).
    ///
    /// # Errors
    ///
    /// Returns the error when the upstream could not be reached or answered
    /// with a 5xx or 429 status.
    pub async fn fetch_rate(&self, code: &CurrencyCode) -> SourceResult<Option<f64>> {
        let url = format!("{}/{}", self.base_url, code);

        let dto: LatestRatesDto = match self.client.get(&url).await {
            Ok(dto) => dto,
            Err(e) if e.is_service_failure() => return Err(e),
            Err(e) => {
                debug!(currency = %code, error = %e, "no rate for currency");
                return Ok(None);
            }
        };

        if dto.result != "success" {
            debug!(currency = %code, result = %dto.result, "upstream reported failure");
            return Ok(None);
        }

        Ok(dto
            .rates
            .get(self.base_currency.as_str())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0))
    }
}

#[async_trait]
impl ExchangeRateSource for OpenErApiSource {
    async fn fetch_rates(&self, codes: &BTreeSet<CurrencyCode>) -> SourceResult<RateTable> {
        if codes.is_empty() {
            return Ok(RateTable::new());
        }

        let requested = codes.len();
        debug!(
            requested,
            max_in_flight = self.max_concurrent_requests,
            "fetching exchange rates"
        );

        let results: Vec<(CurrencyCode, SourceResult<Option<f64>>)> =
            stream::iter(codes.iter().cloned())
                .map(|code| async move {
                    let result = self.fetch_rate(&code).await;
                    (code, result)
                })
                .buffer_unordered(self.max_concurrent_requests)
                .collect()
                .await;

        let mut rates = RateTable::with_capacity(requested);
        let mut failures = Vec::new();
        for (code, result) in results {
            match result {
                Ok(Some(rate)) => {
                    rates.insert(code, rate);
                }
                Ok(None) => {}
                Err(e) => failures.push(e),
            }
        }

        if failures.len() == requested {
            let first = failures
                .into_iter()
                .next()
                .map(|e| e.to_string())
                .unwrap_or_default();
            return Err(SourceError::unavailable(
                UPSTREAM,
                format!("all {} rate requests failed, first error: {}", requested, first),
            ));
        }
        if !failures.is_empty() {
            warn!(
                failed = failures.len(),
                requested, "some rate requests failed at the upstream"
            );
        }

        info!(requested, resolved = rates.len(), "fetched exchange rates");
        Ok(rates)
    }
}
