//! Country cache server binary.

use anyhow::Context;
use country_cache::api::rest::{AppState, create_router};
use country_cache::application::services::RefreshService;
use country_cache::config::AppConfig;
use country_cache::infrastructure::persistence::SqliteCountryRepository;
use country_cache::infrastructure::persistence::sqlite::connect;
use country_cache::infrastructure::rendering::{FileImageStore, PngSummaryRenderer};
use country_cache::infrastructure::sources::{OpenErApiSource, RestCountriesSource};
use country_cache::telemetry;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("loading configuration")?;
    telemetry::init(&config.log).context("installing tracing subscriber")?;

    let pool = connect(&config.storage.database_url)
        .await
        .context("opening database")?;
    let repository = Arc::new(SqliteCountryRepository::new(pool));

    let countries = Arc::new(RestCountriesSource::new(
        config.sources.countries_url.clone(),
        config.sources.timeout_ms,
    )?);
    let rates = Arc::new(
        OpenErApiSource::new(
            config.sources.exchange_rate_url.clone(),
            config.base_currency()?,
            config.sources.timeout_ms,
        )?
        .with_max_concurrent_requests(config.sources.max_concurrent_requests),
    );
    let images = Arc::new(FileImageStore::new(config.storage.image_path.clone()));

    let refresh = Arc::new(RefreshService::new(
        countries,
        rates,
        repository.clone(),
        Arc::new(PngSummaryRenderer::new()),
        images.clone(),
        config.refresh_config(),
    ));

    let state = Arc::new(AppState::new(repository, refresh, images));
    let router = create_router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, version = env!("CARGO_PKG_VERSION"), "country cache listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received shutdown signal");
    }
}
