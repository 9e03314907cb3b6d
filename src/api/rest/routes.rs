//! Router construction.

use crate::api::rest::handlers::{
    AppState, delete_country, get_country, get_status, get_summary_image, health,
    list_countries, refresh_countries,
};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the REST router.
///
/// Static segments win over the `{name}` capture, so `/countries/image` and
/// `/countries/refresh` never reach the per-country handlers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/countries/refresh", post(refresh_countries))
        .route("/countries/image", get(get_summary_image))
        .route("/countries/{name}", get(get_country).delete(delete_country))
        .route("/status", get(get_status))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
