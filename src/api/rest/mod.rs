//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! ## Countries
//! - `POST /countries/refresh` - Refresh the store from the upstream APIs
//! - `GET /countries` - List countries (`region`, `currency`, `sort` query parameters)
//! - `GET /countries/{name}` - Get a country by exact name
//! - `DELETE /countries/{name}` - Delete a country by exact name
//! - `GET /countries/image` - Latest summary image
//!
//! ## Status
//! - `GET /status` - Record count and last refresh time
//! - `GET /health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use country_cache::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(repository, refresh_service, image_store));
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    AppState, CountryResponse, ErrorResponse, HealthResponse, ListCountriesParams, StatusResponse,
};
pub use routes::create_router;
