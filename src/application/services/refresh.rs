//! # Refresh Service
//!
//! Orchestrates a refresh: fetch countries, fetch the rates of their
//! currencies once, join, replace the store, then redraw the summary image.
//!
//! # Failure semantics
//!
//! Any source failure aborts before the store is touched. Once the store
//! write has committed the refresh is a success; a failure to render or
//! store the summary image is logged and reported through
//! [`RefreshResult::image_rendered`].
//!
//! # Concurrency
//!
//! At most one refresh runs at a time. A second caller waits for the one in
//! flight to finish and then performs its own.

use crate::application::error::ApplicationResult;
use crate::application::services::summary::{DEFAULT_TOP_N, build_summary};
use crate::domain::entities::Country;
use crate::domain::value_objects::{CurrencyCode, Timestamp};
use crate::infrastructure::persistence::CountryRepository;
use crate::infrastructure::rendering::{ImageStore, RenderResult, SummaryRenderer, SummaryStats};
use crate::infrastructure::sources::{CountrySource, ExchangeRateSource};
use bytes::Bytes;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Default output per person, in local currency units.
pub const DEFAULT_GDP_PER_CAPITA_FACTOR: f64 = 1500.0;

/// Configuration for refreshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshConfig {
    /// Multiplier applied to population and exchange rate for the GDP estimate.
    pub gdp_per_capita_factor: f64,
    /// Number of countries drawn on the summary image.
    pub summary_top_n: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            gdp_per_capita_factor: DEFAULT_GDP_PER_CAPITA_FACTOR,
            summary_top_n: DEFAULT_TOP_N,
        }
    }
}

impl RefreshConfig {
    /// Sets the GDP per-capita factor.
    #[must_use]
    pub fn with_gdp_per_capita_factor(mut self, factor: f64) -> Self {
        self.gdp_per_capita_factor = factor;
        self
    }

    /// Sets the number of countries drawn on the summary image.
    #[must_use]
    pub fn with_summary_top_n(mut self, n: usize) -> Self {
        self.summary_top_n = n;
        self
    }
}

/// Outcome of a successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshResult {
    /// Number of records written.
    pub count: u64,
    /// Timestamp written on every record.
    pub last_refreshed_at: Timestamp,
    /// Whether the summary image was replaced.
    pub image_rendered: bool,
}

/// Refresh orchestrator.
#[derive(Debug)]
pub struct RefreshService {
    countries: Arc<dyn CountrySource>,
    rates: Arc<dyn ExchangeRateSource>,
    repository: Arc<dyn CountryRepository>,
    renderer: Arc<dyn SummaryRenderer>,
    images: Arc<dyn ImageStore>,
    config: RefreshConfig,
    in_flight: Mutex<()>,
}

impl RefreshService {
    /// Creates a new RefreshService.
    #[must_use]
    pub fn new(
        countries: Arc<dyn CountrySource>,
        rates: Arc<dyn ExchangeRateSource>,
        repository: Arc<dyn CountryRepository>,
        renderer: Arc<dyn SummaryRenderer>,
        images: Arc<dyn ImageStore>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            countries,
            rates,
            repository,
            renderer,
            images,
            config,
            in_flight: Mutex::new(()),
        }
    }

    /// MIME type of the summary image.
    #[must_use]
    pub fn image_content_type(&self) -> &'static str {
        self.renderer.content_type()
    }

    /// Runs a full refresh.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Source` if either upstream fails; the store is
    ///   left unchanged
    /// - `ApplicationError::Repository` if the bulk replace fails; the store
    ///   keeps its previous content
    pub async fn refresh(&self) -> ApplicationResult<RefreshResult> {
        let _guard = self.in_flight.lock().await;
        let started = Instant::now();
        info!("starting refresh");

        let raw = self.countries.fetch_countries().await?;

        let codes: BTreeSet<CurrencyCode> = raw
            .iter()
            .filter_map(|c| c.currency_code.clone())
            .collect();
        let rates = self.rates.fetch_rates(&codes).await?;

        let refreshed_at = Timestamp::now();
        let records: Vec<Country> = raw
            .into_iter()
            .map(|entry| {
                let rate = entry
                    .currency_code
                    .as_ref()
                    .and_then(|code| rates.get(code).copied());
                Country::from_raw(entry, rate, self.config.gdp_per_capita_factor, refreshed_at)
            })
            .collect();

        let count = self.repository.replace_all(&records).await?;

        let stats = build_summary(&records, self.config.summary_top_n, refreshed_at);
        let image_rendered = match self.update_image(&stats).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "summary image not updated");
                false
            }
        };

        info!(
            count,
            currencies = codes.len(),
            resolved_rates = rates.len(),
            image_rendered,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "refresh complete"
        );

        Ok(RefreshResult {
            count,
            last_refreshed_at: refreshed_at,
            image_rendered,
        })
    }

    async fn update_image(&self, stats: &SummaryStats) -> RenderResult<()> {
        let png = self.renderer.render(stats)?;
        self.images.put(Bytes::from(png)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::domain::entities::RawCountry;
    use crate::domain::value_objects::CountryFilter;
    use crate::infrastructure::persistence::InMemoryCountryRepository;
    use crate::infrastructure::rendering::{InMemoryImageStore, PngSummaryRenderer, RenderError};
    use crate::infrastructure::sources::{RateTable, SourceError, SourceResult};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    #[derive(Debug, Default)]
    struct MockCountrySource {
        countries: Vec<RawCountry>,
        fail: bool,
        delay_ms: u64,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl MockCountrySource {
        fn with(countries: Vec<RawCountry>) -> Self {
            Self {
                countries,
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CountrySource for MockCountrySource {
        async fn fetch_countries(&self) -> SourceResult<Vec<RawCountry>> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.fail {
                return Err(SourceError::timeout("countries"));
            }
            Ok(self.countries.clone())
        }
    }

    #[derive(Debug, Default)]
    struct MockRateSource {
        rates: RateTable,
        fail: bool,
        requests: StdMutex<Vec<BTreeSet<CurrencyCode>>>,
    }

    impl MockRateSource {
        fn with(rates: &[(&str, f64)]) -> Self {
            Self {
                rates: rates.iter().map(|(c, r)| (code(c), *r)).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ExchangeRateSource for MockRateSource {
        async fn fetch_rates(&self, codes: &BTreeSet<CurrencyCode>) -> SourceResult<RateTable> {
            self.requests.lock().unwrap().push(codes.clone());
            if self.fail {
                return Err(SourceError::unavailable("rates", "connection refused"));
            }
            Ok(self
                .rates
                .iter()
                .filter(|(c, _)| codes.contains(*c))
                .map(|(c, r)| (c.clone(), *r))
                .collect())
        }
    }

    #[derive(Debug)]
    struct FailingRenderer;

    impl SummaryRenderer for FailingRenderer {
        fn render(&self, _stats: &SummaryStats) -> RenderResult<Vec<u8>> {
            Err(RenderError::encoding("boom"))
        }

        fn content_type(&self) -> &'static str {
            "image/png"
        }
    }

    struct Harness {
        service: RefreshService,
        repository: Arc<InMemoryCountryRepository>,
        images: Arc<InMemoryImageStore>,
        rates: Arc<MockRateSource>,
    }

    fn harness(
        countries: MockCountrySource,
        rates: MockRateSource,
        renderer: Arc<dyn SummaryRenderer>,
    ) -> Harness {
        let repository = Arc::new(InMemoryCountryRepository::new());
        let images = Arc::new(InMemoryImageStore::new());
        let rates = Arc::new(rates);
        let service = RefreshService::new(
            Arc::new(countries),
            rates.clone(),
            repository.clone(),
            renderer,
            images.clone(),
            RefreshConfig::default(),
        );
        Harness {
            service,
            repository,
            images,
            rates,
        }
    }

    fn sample_countries() -> Vec<RawCountry> {
        vec![
            RawCountry::new("Nigeria", 200)
                .with_region("Africa")
                .with_currency(code("NGN")),
            RawCountry::new("Ghana", 30)
                .with_region("Africa")
                .with_currency(code("GHS")),
            RawCountry::new("France", 67)
                .with_region("Europe")
                .with_currency(code("EUR")),
            RawCountry::new("Germany", 83)
                .with_region("Europe")
                .with_currency(code("EUR")),
            RawCountry::new("Antarctica", 1000),
        ]
    }

    #[tokio::test]
    async fn refresh_joins_rates_and_writes_store() {
        let h = harness(
            MockCountrySource::with(sample_countries()),
            MockRateSource::with(&[("NGN", 0.002), ("EUR", 1.1)]),
            Arc::new(PngSummaryRenderer::new()),
        );

        let result = h.service.refresh().await.unwrap();

        assert_eq!(result.count, 5);
        assert!(result.image_rendered);

        let nigeria = h.repository.get_by_name("Nigeria").await.unwrap().unwrap();
        assert_eq!(nigeria.exchange_rate(), Some(0.002));
        assert_eq!(nigeria.estimated_gdp(), Some(200.0 * 1500.0 * 0.002));
        assert_eq!(nigeria.last_refreshed_at(), result.last_refreshed_at);

        let ghana = h.repository.get_by_name("Ghana").await.unwrap().unwrap();
        assert_eq!(ghana.exchange_rate(), None);
        assert_eq!(ghana.estimated_gdp(), None);

        let antarctica = h.repository.get_by_name("Antarctica").await.unwrap().unwrap();
        assert_eq!(antarctica.estimated_gdp(), None);

        let status = h.repository.status().await.unwrap();
        assert_eq!(status.count, 5);
        assert_eq!(status.last_refreshed_at, Some(result.last_refreshed_at));

        assert!(h.images.get().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rates_fetched_once_for_distinct_codes() {
        let h = harness(
            MockCountrySource::with(sample_countries()),
            MockRateSource::with(&[]),
            Arc::new(PngSummaryRenderer::new()),
        );

        h.service.refresh().await.unwrap();

        let requests = h.rates.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let expected: BTreeSet<CurrencyCode> =
            ["EUR", "GHS", "NGN"].into_iter().map(code).collect();
        assert_eq!(requests[0], expected);
    }

    #[tokio::test]
    async fn country_source_failure_leaves_store_untouched() {
        let h = harness(
            MockCountrySource::failing(),
            MockRateSource::with(&[]),
            Arc::new(PngSummaryRenderer::new()),
        );
        let existing = vec![Country::builder("Chad", 16).build()];
        h.repository.replace_all(&existing).await.unwrap();

        let err = h.service.refresh().await.unwrap_err();

        assert!(err.is_source());
        assert!(h.rates.requests.lock().unwrap().is_empty());
        let listed = h.repository.list(&CountryFilter::new()).await.unwrap();
        assert_eq!(listed, existing);
        assert!(h.images.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rate_source_failure_leaves_store_untouched() {
        let rates = MockRateSource {
            fail: true,
            ..Default::default()
        };
        let h = harness(
            MockCountrySource::with(sample_countries()),
            rates,
            Arc::new(PngSummaryRenderer::new()),
        );
        let existing = vec![Country::builder("Chad", 16).build()];
        h.repository.replace_all(&existing).await.unwrap();

        let err = h.service.refresh().await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Source(SourceError::SourceUnavailable { .. })
        ));
        assert_eq!(h.repository.status().await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn render_failure_keeps_store_write() {
        let h = harness(
            MockCountrySource::with(sample_countries()),
            MockRateSource::with(&[("EUR", 1.1)]),
            Arc::new(FailingRenderer),
        );

        let result = h.service.refresh().await.unwrap();

        assert!(!result.image_rendered);
        assert_eq!(result.count, 5);
        assert_eq!(h.repository.status().await.unwrap().count, 5);
        assert!(h.images.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_catalog_empties_store() {
        let h = harness(
            MockCountrySource::with(vec![]),
            MockRateSource::with(&[]),
            Arc::new(PngSummaryRenderer::new()),
        );
        h.repository
            .replace_all(&[Country::builder("Chad", 16).build()])
            .await
            .unwrap();

        let result = h.service.refresh().await.unwrap();

        assert_eq!(result.count, 0);
        assert_eq!(h.repository.status().await.unwrap().count, 0);
        assert!(h.rates.requests.lock().unwrap()[0].is_empty());
    }

    #[tokio::test]
    async fn concurrent_refreshes_are_serialized() {
        let countries = Arc::new(MockCountrySource {
            countries: sample_countries(),
            delay_ms: 50,
            ..Default::default()
        });
        let service = Arc::new(RefreshService::new(
            countries.clone(),
            Arc::new(MockRateSource::with(&[("EUR", 1.0)])),
            Arc::new(InMemoryCountryRepository::new()),
            Arc::new(PngSummaryRenderer::new()),
            Arc::new(InMemoryImageStore::new()),
            RefreshConfig::default(),
        ));

        let (a, b) = tokio::join!(service.refresh(), service.refresh());

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.count, 5);
        assert_eq!(b.count, 5);
        assert_ne!(a.last_refreshed_at, b.last_refreshed_at);
        assert_eq!(countries.max_active.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn config_builders() {
        let config = RefreshConfig::default()
            .with_gdp_per_capita_factor(2000.0)
            .with_summary_top_n(3);
        assert_eq!(config.gdp_per_capita_factor, 2000.0);
        assert_eq!(config.summary_top_n, 3);
    }
}
