//! # REST Handlers
//!
//! Request handlers, response types and the error-to-status mapping.

use crate::application::error::ApplicationError;
use crate::application::services::{RefreshResult, RefreshService};
use crate::domain::entities::Country;
use crate::domain::value_objects::{CountryFilter, CountrySort, RefreshStatus, Timestamp};
use crate::infrastructure::persistence::CountryRepository;
use crate::infrastructure::rendering::ImageStore;
use crate::infrastructure::sources::SourceError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Country store.
    pub repository: Arc<dyn CountryRepository>,
    /// Refresh orchestrator.
    pub refresh: Arc<RefreshService>,
    /// Summary image slot.
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Creates the handler state.
    #[must_use]
    pub fn new(
        repository: Arc<dyn CountryRepository>,
        refresh: Arc<RefreshService>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            repository,
            refresh,
            images,
        }
    }
}

/// Query parameters for `GET /countries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCountriesParams {
    /// Region filter, case-insensitive.
    pub region: Option<String>,
    /// Currency code filter, case-insensitive.
    pub currency: Option<String>,
    /// `gdp_desc` or `pop_desc`.
    pub sort: Option<String>,
}

impl ListCountriesParams {
    /// Validates the parameters into a filter.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::InvalidParameter` for an unknown sort key or
    /// a blank filter.
    pub fn into_filter(self) -> Result<CountryFilter, ApplicationError> {
        let mut filter = CountryFilter::new();
        if let Some(region) = self.region {
            filter = filter.with_region(region)?;
        }
        if let Some(currency) = self.currency {
            filter = filter.with_currency(currency)?;
        }
        if let Some(sort) = self.sort {
            filter = filter.with_sort(sort.parse::<CountrySort>()?);
        }
        Ok(filter)
    }
}

/// Country representation on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryResponse {
    /// Record ID.
    pub id: Uuid,
    /// Country name.
    pub name: String,
    /// Capital city.
    pub capital: Option<String>,
    /// Region.
    pub region: Option<String>,
    /// Population.
    pub population: u64,
    /// Currency code.
    pub currency_code: Option<String>,
    /// Base-currency value of one unit of the local currency.
    pub exchange_rate: Option<f64>,
    /// GDP estimate.
    pub estimated_gdp: Option<f64>,
    /// Flag image URL.
    pub flag_url: Option<String>,
    /// Refresh that wrote the record.
    pub last_refreshed_at: Timestamp,
}

impl From<&Country> for CountryResponse {
    fn from(country: &Country) -> Self {
        Self {
            id: country.id(),
            name: country.name().to_string(),
            capital: country.capital().map(str::to_string),
            region: country.region().map(str::to_string),
            population: country.population(),
            currency_code: country.currency_code().map(|c| c.to_string()),
            exchange_rate: country.exchange_rate(),
            estimated_gdp: country.estimated_gdp(),
            flag_url: country.flag_url().map(str::to_string),
            last_refreshed_at: country.last_refreshed_at(),
        }
    }
}

/// Response for `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Number of stored countries.
    pub total_countries: u64,
    /// Most recent refresh, `null` before the first one.
    pub last_refreshed_at: Option<Timestamp>,
}

impl From<RefreshStatus> for StatusResponse {
    fn from(status: RefreshStatus) -> Self {
        Self {
            total_countries: status.count,
            last_refreshed_at: status.last_refreshed_at,
        }
    }
}

/// Response for `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short description.
    pub error: String,
    /// Additional context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates an error body without details.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Adds details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ApplicationError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Source(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Self::Repository(_) | Self::Render(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::Source(e) => {
                let upstream = match e {
                    SourceError::SourceUnavailable { upstream, .. }
                    | SourceError::MalformedResponse { upstream, .. } => upstream,
                };
                ErrorResponse::new("External data source unavailable")
                    .with_details(format!("Could not fetch data from {upstream}"))
            }
            Self::NotFound { resource, .. } => {
                ErrorResponse::new(format!("{} not found", capitalize(resource)))
            }
            Self::InvalidParameter { message, .. } => {
                ErrorResponse::new("Validation failed").with_details(message.clone())
            }
            Self::Repository(_) | Self::Render(_) | Self::Internal(_) => {
                ErrorResponse::new("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(self.to_error_response())).into_response()
    }
}

/// `POST /countries/refresh`
pub async fn refresh_countries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResult>, ApplicationError> {
    let result = state.refresh.refresh().await?;
    Ok(Json(result))
}

/// `GET /countries`
pub async fn list_countries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListCountriesParams>,
) -> Result<Json<Vec<CountryResponse>>, ApplicationError> {
    let filter = params.into_filter()?;
    let countries = state.repository.list(&filter).await?;
    Ok(Json(countries.iter().map(CountryResponse::from).collect()))
}

/// `GET /countries/{name}`
pub async fn get_country(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CountryResponse>, ApplicationError> {
    let country = state
        .repository
        .get_by_name(&name)
        .await?
        .ok_or_else(|| ApplicationError::not_found("country", name))?;
    Ok(Json(CountryResponse::from(&country)))
}

/// `DELETE /countries/{name}`
pub async fn delete_country(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApplicationError> {
    if !state.repository.delete_by_name(&name).await? {
        return Err(ApplicationError::not_found("country", name));
    }
    info!(country = %name, "deleted country");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApplicationError> {
    let status = state.repository.status().await?;
    Ok(Json(status.into()))
}

/// `GET /countries/image`
pub async fn get_summary_image(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApplicationError> {
    let image = state
        .images
        .get()
        .await?
        .ok_or_else(|| ApplicationError::not_found("summary image", "latest"))?;
    Ok((
        [(header::CONTENT_TYPE, state.refresh.image_content_type())],
        image,
    )
        .into_response())
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::RepositoryError;
    use crate::infrastructure::rendering::RenderError;

    #[test]
    fn status_mapping() {
        let cases = [
            (
                ApplicationError::from(SourceError::timeout("restcountries")),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApplicationError::from(RepositoryError::query("locked")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApplicationError::not_found("country", "Atlantis"),
                StatusCode::NOT_FOUND,
            ),
            (
                ApplicationError::invalid_parameter("sort", "bad"),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApplicationError::from(RenderError::io("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApplicationError::internal("oops"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
        }
    }

    #[test]
    fn error_bodies() {
        let body = ApplicationError::from(SourceError::malformed("open-er-api", "not json"))
            .to_error_response();
        assert_eq!(body.error, "External data source unavailable");
        assert_eq!(
            body.details.as_deref(),
            Some("Could not fetch data from open-er-api")
        );

        let body = ApplicationError::not_found("country", "Atlantis").to_error_response();
        assert_eq!(body, ErrorResponse::new("Country not found"));

        let body = ApplicationError::not_found("summary image", "latest").to_error_response();
        assert_eq!(body.error, "Summary image not found");

        let body = ApplicationError::from(RepositoryError::connection("secret path"))
            .to_error_response();
        assert_eq!(body, ErrorResponse::new("Internal server error"));
    }

    #[test]
    fn error_response_omits_missing_details() {
        let json = serde_json::to_value(ErrorResponse::new("Country not found")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Country not found"}));
    }

    #[test]
    fn params_into_filter() {
        let filter = ListCountriesParams {
            region: Some("Africa".to_string()),
            currency: Some("ngn".to_string()),
            sort: Some("gdp_desc".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.region(), Some("Africa"));
        assert_eq!(filter.sort(), Some(CountrySort::GdpDesc));

        assert!(ListCountriesParams::default().into_filter().is_ok());
    }

    #[test]
    fn params_reject_bad_sort_and_blank_filters() {
        let err = ListCountriesParams {
            sort: Some("name".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(err.is_invalid_parameter());

        let err = ListCountriesParams {
            region: Some("   ".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("country"), "Country");
        assert_eq!(capitalize(""), "");
    }
}
