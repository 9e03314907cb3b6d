//! # REST Countries Adapter
//!
//! [`CountrySource`] backed by a REST Countries v2 style endpoint.
//!
//! The endpoint is asked for `name,capital,region,population,flag,currencies`
//! and must answer with a JSON array. Each element is validated on its own:
//! entries without a name or population are dropped, currency codes that are
//! not three letters are nulled out, and repeated names keep only their
//! first entry.

use crate::domain::entities::RawCountry;
use crate::domain::value_objects::CurrencyCode;
use crate::infrastructure::sources::error::{SourceError, SourceResult};
use crate::infrastructure::sources::http_client::HttpClient;
use crate::infrastructure::sources::traits::CountrySource;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Upstream name used in errors and logs.
pub const UPSTREAM: &str = "restcountries";

/// Fields requested from the catalog.
const FIELDS: &str = "name,capital,region,population,flag,currencies";

/// One catalog entry as it appears on the wire.
#[derive(Debug, Deserialize)]
struct CountryDto {
    name: Option<String>,
    #[serde(default)]
    capital: Option<serde_json::Value>,
    region: Option<String>,
    population: Option<u64>,
    flag: Option<String>,
    #[serde(default)]
    currencies: Option<Vec<CurrencyDto>>,
}

#[derive(Debug, Deserialize)]
struct CurrencyDto {
    code: Option<String>,
}

impl CountryDto {
    /// Validates the entry. Returns `None` when it cannot become a record.
    fn into_raw(self) -> Option<RawCountry> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let population = self.population?;

        let currency_code = self
            .currencies
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.code)
            .and_then(|code| CurrencyCode::new(code).ok());

        Some(RawCountry {
            name: name.trim().to_string(),
            capital: self.capital.and_then(capital_text),
            region: non_blank(self.region),
            population,
            currency_code,
            flag_url: non_blank(self.flag),
        })
    }
}

/// Capital is a string in v2 and an array of strings in later versions.
fn capital_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => non_blank(Some(s)),
        serde_json::Value::Array(items) => items
            .into_iter()
            .find_map(|v| v.as_str().map(str::to_string))
            .and_then(|s| non_blank(Some(s))),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// REST Countries catalog adapter.
#[derive(Debug, Clone)]
pub struct RestCountriesSource {
    client: HttpClient,
    url: String,
}

impl RestCountriesSource {
    /// Creates an adapter for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> SourceResult<Self> {
        Ok(Self {
            client: HttpClient::new(UPSTREAM, timeout_ms)?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CountrySource for RestCountriesSource {
    async fn fetch_countries(&self) -> SourceResult<Vec<RawCountry>> {
        debug!(url = %self.url, "fetching country catalog");

        let entries: Vec<serde_json::Value> = self
            .client
            .get_with_params(&self.url, &[("fields", FIELDS)])
            .await?;
        let received = entries.len();

        let mut seen = HashSet::with_capacity(received);
        let countries: Vec<RawCountry> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<CountryDto>(entry) {
                Ok(dto) => dto.into_raw(),
                Err(e) => {
                    debug!(error = %e, "skipping catalog entry with unexpected shape");
                    None
                }
            })
            .filter(|country| {
                let first = seen.insert(country.name.clone());
                if !first {
                    debug!(name = %country.name, "skipping duplicate catalog entry");
                }
                first
            })
            .collect();

        if received > 0 && countries.is_empty() {
            return Err(SourceError::malformed(
                UPSTREAM,
                format!("none of {} entries had a usable name and population", received),
            ));
        }

        let dropped = received - countries.len();
        if dropped > 0 {
            warn!(received, dropped, "dropped catalog entries that failed validation");
        }
        info!(count = countries.len(), "fetched country catalog");

        Ok(countries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(body: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/all"))
            .and(query_param("fields", FIELDS))
            .respond_with(body)
            .mount(&server)
            .await;
        server
    }

    fn source(server: &MockServer) -> RestCountriesSource {
        RestCountriesSource::new(format!("{}/v2/all", server.uri()), 2000).unwrap()
    }

    #[tokio::test]
    async fn parses_entries() {
        let server = serve(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "Nigeria",
                "capital": "Abuja",
                "region": "Africa",
                "population": 206139589,
                "flag": "https://flagcdn.com/ng.svg",
                "currencies": [{"code": "NGN", "name": "Nigerian naira", "symbol": "₦"}],
                "independent": false
            },
            {
                "name": "Ghana",
                "capital": ["Accra"],
                "region": "Africa",
                "population": 31072945,
                "currencies": [{"code": "GHS"}, {"code": "USD"}]
            }
        ])))
        .await;

        let countries = source(&server).fetch_countries().await.unwrap();

        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name, "Nigeria");
        assert_eq!(countries[0].capital.as_deref(), Some("Abuja"));
        assert_eq!(countries[0].currency_code.as_ref().unwrap().as_str(), "NGN");
        assert_eq!(countries[0].flag_url.as_deref(), Some("https://flagcdn.com/ng.svg"));
        assert_eq!(countries[1].capital.as_deref(), Some("Accra"));
        assert_eq!(countries[1].currency_code.as_ref().unwrap().as_str(), "GHS");
    }

    #[tokio::test]
    async fn drops_entries_missing_required_fields_and_nulls_bad_codes() {
        let server = serve(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Antarctica", "region": "Polar", "population": 1000},
            {"name": "Weird", "population": 5, "currencies": [{"code": "(none)"}]},
            {"region": "Nowhere", "population": 10},
            {"name": "No Population"},
            {"name": "Negative", "population": -4}
        ])))
        .await;

        let countries = source(&server).fetch_countries().await.unwrap();

        let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Antarctica", "Weird"]);
        assert!(countries[0].currency_code.is_none());
        assert!(countries[1].currency_code.is_none());
    }

    #[tokio::test]
    async fn keeps_first_of_duplicate_names() {
        let server = serve(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Congo", "population": 5},
            {"name": "Congo", "population": 90}
        ])))
        .await;

        let countries = source(&server).fetch_countries().await.unwrap();

        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].population, 5);
    }

    #[tokio::test]
    async fn non_array_body_is_malformed() {
        let server =
            serve(ResponseTemplate::new(200).set_body_json(json!({"status": 404}))).await;
        let err = source(&server).fetch_countries().await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn all_entries_invalid_is_malformed() {
        let server = serve(ResponseTemplate::new(200).set_body_json(json!([{"foo": 1}]))).await;
        let err = source(&server).fetch_countries().await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let server = serve(ResponseTemplate::new(500)).await;
        let err = source(&server).fetch_countries().await.unwrap_err();
        assert!(matches!(err, SourceError::SourceUnavailable { status: Some(500), .. }));
    }
}
