//! # In-Memory Country Repository
//!
//! In-memory implementation of [`CountryRepository`].
//!
//! This implementation uses a thread-safe `HashMap` keyed by name, making it
//! suitable for unit tests and for running without a database.

use crate::domain::entities::{Country, sort_countries};
use crate::domain::value_objects::{CountryFilter, RefreshStatus};
use crate::infrastructure::persistence::traits::{
    CountryRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`CountryRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryCountryRepository {
    storage: Arc<RwLock<HashMap<String, Country>>>,
}

impl InMemoryCountryRepository {
    /// Creates a new empty in-memory country repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCountryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CountryRepository for InMemoryCountryRepository {
    async fn replace_all(&self, countries: &[Country]) -> RepositoryResult<u64> {
        let mut next = HashMap::with_capacity(countries.len());
        for country in countries {
            if next
                .insert(country.name().to_string(), country.clone())
                .is_some()
            {
                return Err(RepositoryError::query(format!(
                    "duplicate country name: {}",
                    country.name()
                )));
            }
        }

        let written = next.len() as u64;
        let mut storage = self.storage.write().await;
        *storage = next;
        Ok(written)
    }

    async fn list(&self, filter: &CountryFilter) -> RepositoryResult<Vec<Country>> {
        let storage = self.storage.read().await;
        let mut countries: Vec<Country> = storage
            .values()
            .filter(|c| filter.matches_region(c.region()))
            .filter(|c| filter.matches_currency(c.currency_code()))
            .cloned()
            .collect();
        drop(storage);

        sort_countries(&mut countries, filter.sort());
        Ok(countries)
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<Country>> {
        let storage = self.storage.read().await;
        Ok(storage.get(name).cloned())
    }

    async fn delete_by_name(&self, name: &str) -> RepositoryResult<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.remove(name).is_some())
    }

    async fn status(&self) -> RepositoryResult<RefreshStatus> {
        let storage = self.storage.read().await;
        Ok(RefreshStatus {
            count: storage.len() as u64,
            last_refreshed_at: storage.values().map(Country::last_refreshed_at).max(),
        })
    }
}
