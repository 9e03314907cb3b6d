//! # SQLite Country Repository
//!
//! SQLite implementation of [`CountryRepository`] using sqlx.
//!
//! Timestamps are stored as Unix milliseconds and IDs as text. A bulk
//! replace runs as one transaction: `DELETE` everything, insert the new
//! set in multi-row batches, commit. Dropping the future before commit rolls the transaction back.

use crate::domain::entities::Country;
use crate::domain::value_objects::{
    CountryFilter, CountrySort, CurrencyCode, RefreshStatus, Timestamp,
};
use crate::infrastructure::persistence::traits::{
    CountryRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

/// Rows per multi-row `INSERT`; ten binds each keeps a statement under
/// SQLite's 999 parameter limit.
const INSERT_CHUNK: usize = 90;

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, capital, region, population, currency_code,
           exchange_rate, estimated_gdp, flag_url, last_refreshed_at
    FROM countries
"#;

/// SQLite implementation of [`CountryRepository`].
///
/// # Examples
///
/// ```ignore
/// use country_cache::infrastructure::persistence::sqlite::{connect, SqliteCountryRepository};
///
/// let pool = connect("sqlite://countries.db").await?;
/// let repo = SqliteCountryRepository::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteCountryRepository {
    pool: SqlitePool,
}

impl SqliteCountryRepository {
    /// Creates a repository over an existing pool whose schema is in place.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn order_clause(sort: Option<CountrySort>) -> &'static str {
    match sort {
        Some(CountrySort::GdpDesc) => {
            " ORDER BY estimated_gdp IS NULL, estimated_gdp DESC, name ASC"
        }
        Some(CountrySort::PopDesc) => " ORDER BY population DESC, name ASC",
        None => " ORDER BY name ASC",
    }
}

#[async_trait]
impl CountryRepository for SqliteCountryRepository {
    async fn replace_all(&self, countries: &[Country]) -> RepositoryResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;

        sqlx::query("DELETE FROM countries")
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        let rows = countries
            .iter()
            .map(|country| {
                i64::try_from(country.population())
                    .map(|population| (country, population))
                    .map_err(|_| {
                        RepositoryError::serialization(format!(
                            "population of {} out of range",
                            country.name()
                        ))
                    })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut insert: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
                "INSERT INTO countries (id, name, capital, region, population, currency_code, \
                 exchange_rate, estimated_gdp, flag_url, last_refreshed_at) ",
            );
            insert.push_values(chunk, |mut row, &(country, population)| {
                row.push_bind(country.id().to_string())
                    .push_bind(country.name())
                    .push_bind(country.capital())
                    .push_bind(country.region())
                    .push_bind(population)
                    .push_bind(country.currency_code().map(CurrencyCode::as_str))
                    .push_bind(country.exchange_rate())
                    .push_bind(country.estimated_gdp())
                    .push_bind(country.flag_url())
                    .push_bind(country.last_refreshed_at().timestamp_millis());
            });
            insert
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        debug!(count = countries.len(), "replaced country records");
        Ok(countries.len() as u64)
    }

    async fn list(&self, filter: &CountryFilter) -> RepositoryResult<Vec<Country>> {
        let mut sql = String::from(SELECT_COLUMNS);
        let mut conditions = Vec::new();
        if filter.region().is_some() {
            conditions.push("region = ? COLLATE NOCASE");
        }
        if filter.currency().is_some() {
            conditions.push("currency_code = ? COLLATE NOCASE");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(order_clause(filter.sort()));

        let mut query = sqlx::query_as::<_, CountryRow>(&sql);
        if let Some(region) = filter.region() {
            query = query.bind(region);
        }
        if let Some(currency) = filter.currency() {
            query = query.bind(currency);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(CountryRow::try_into_country).collect()
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<Country>> {
        let sql = format!("{} WHERE name = ?", SELECT_COLUMNS);
        let row: Option<CountryRow> = sqlx::query_as(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(CountryRow::try_into_country).transpose()
    }

    async fn delete_by_name(&self, name: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM countries WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn status(&self) -> RepositoryResult<RefreshStatus> {
        let (count, latest): (i64, Option<i64>) =
            sqlx::query_as("SELECT COUNT(*), MAX(last_refreshed_at) FROM countries")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;

        let last_refreshed_at = latest
            .map(|millis| {
                Timestamp::from_millis(millis)
                    .ok_or_else(|| RepositoryError::serialization("invalid timestamp"))
            })
            .transpose()?;

        Ok(RefreshStatus {
            count: count as u64,
            last_refreshed_at,
        })
    }
}

/// Row type for country queries.
#[derive(Debug, sqlx::FromRow)]
struct CountryRow {
    id: String,
    name: String,
    capital: Option<String>,
    region: Option<String>,
    population: i64,
    currency_code: Option<String>,
    exchange_rate: Option<f64>,
    estimated_gdp: Option<f64>,
    flag_url: Option<String>,
    last_refreshed_at: i64,
}

impl CountryRow {
    /// Converts the row into a Country.
    fn try_into_country(self) -> RepositoryResult<Country> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        let population = u64::try_from(self.population)
            .map_err(|_| RepositoryError::serialization("negative population"))?;
        let currency_code = self
            .currency_code
            .map(CurrencyCode::new)
            .transpose()
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;
        let last_refreshed_at = Timestamp::from_millis(self.last_refreshed_at)
            .ok_or_else(|| RepositoryError::serialization("invalid timestamp"))?;

        Ok(Country::builder(self.name, population)
            .id(id)
            .capital(self.capital)
            .region(self.region)
            .currency_code(currency_code)
            .exchange_rate(self.exchange_rate)
            .estimated_gdp(self.estimated_gdp)
            .flag_url(self.flag_url)
            .last_refreshed_at(last_refreshed_at)
            .build())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::connect;

    async fn repo() -> SqliteCountryRepository {
        SqliteCountryRepository::new(connect("sqlite::memory:").await.unwrap())
    }

    fn at(millis: i64) -> Timestamp {
        Timestamp::from_millis(millis).unwrap()
    }

    fn country(
        name: &str,
        region: &str,
        currency: Option<&str>,
        pop: u64,
        gdp: Option<f64>,
    ) -> Country {
        Country::builder(name, pop)
            .capital(Some(format!("{name} City")))
            .region(Some(region.to_string()))
            .currency_code(currency.map(|c| CurrencyCode::new(c).unwrap()))
            .exchange_rate(gdp.map(|_| 0.5))
            .estimated_gdp(gdp)
            .last_refreshed_at(at(1_700_000_000_000))
            .build()
    }

    fn sample() -> Vec<Country> {
        vec![
            country("Nigeria", "Africa", Some("NGN"), 206, Some(20.0)),
            country("Ghana", "Africa", Some("GHS"), 31, Some(90.0)),
            country("France", "Europe", Some("EUR"), 67, None),
            country("Antarctica", "Polar", None, 1, None),
        ]
    }

    fn names(countries: &[Country]) -> Vec<&str> {
        countries.iter().map(Country::name).collect()
    }

    #[tokio::test]
    async fn empty_status() {
        let repo = repo().await;
        assert_eq!(repo.status().await.unwrap(), RefreshStatus::empty());
    }

    #[tokio::test]
    async fn replace_all_roundtrips_records() {
        let repo = repo().await;
        let countries = sample();
        assert_eq!(repo.replace_all(&countries).await.unwrap(), 4);

        let ghana = repo.get_by_name("Ghana").await.unwrap().unwrap();
        assert_eq!(ghana, countries[1]);
    }

    #[tokio::test]
    async fn replace_all_supersedes_prior_content() {
        let repo = repo().await;
        repo.replace_all(&sample()).await.unwrap();

        let chad = Country::builder("Chad", 16)
            .last_refreshed_at(at(1_800_000_000_000))
            .build();
        repo.replace_all(std::slice::from_ref(&chad)).await.unwrap();

        let status = repo.status().await.unwrap();
        assert_eq!(status.count, 1);
        assert_eq!(status.last_refreshed_at, Some(at(1_800_000_000_000)));
        assert!(repo.get_by_name("Nigeria").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_replace_leaves_prior_content() {
        let repo = repo().await;
        repo.replace_all(&sample()).await.unwrap();

        let dup = vec![
            country("Chad", "Africa", None, 1, None),
            country("Chad", "Africa", None, 2, None),
        ];
        assert!(repo.replace_all(&dup).await.is_err());

        let status = repo.status().await.unwrap();
        assert_eq!(status.count, 4);
        assert!(repo.get_by_name("Chad").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_all_spans_several_insert_batches() {
        let repo = repo().await;
        let many: Vec<Country> = (0..250)
            .map(|i| country(&format!("Country {i:03}"), "Test", Some("USD"), i, Some(1.0)))
            .collect();
        assert!(many.len() > 2 * INSERT_CHUNK);

        assert_eq!(repo.replace_all(&many).await.unwrap(), 250);
        assert_eq!(repo.status().await.unwrap().count, 250);

        let last = repo.get_by_name("Country 249").await.unwrap().unwrap();
        assert_eq!(last, many[249]);
    }

    #[tokio::test]
    async fn failure_in_late_batch_rolls_back_earlier_batches() {
        let repo = repo().await;
        repo.replace_all(&sample()).await.unwrap();

        let mut many: Vec<Country> = (0..200)
            .map(|i| country(&format!("Country {i:03}"), "Test", None, i, None))
            .collect();
        many.push(country("Country 000", "Test", None, 1, None));
        assert!(repo.replace_all(&many).await.is_err());

        assert_eq!(repo.status().await.unwrap().count, 4);
        assert!(repo.get_by_name("Country 100").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let repo = repo().await;
        repo.replace_all(&sample()).await.unwrap();

        let all = repo.list(&CountryFilter::new()).await.unwrap();
        assert_eq!(names(&all), vec!["Antarctica", "France", "Ghana", "Nigeria"]);

        let africa = repo
            .list(&CountryFilter::new().with_region("africa").unwrap())
            .await
            .unwrap();
        assert_eq!(names(&africa), vec!["Ghana", "Nigeria"]);

        let ngn = repo
            .list(&CountryFilter::new().with_currency("Ngn").unwrap())
            .await
            .unwrap();
        assert_eq!(names(&ngn), vec!["Nigeria"]);

        let by_gdp = repo
            .list(&CountryFilter::new().with_sort(CountrySort::GdpDesc))
            .await
            .unwrap();
        assert_eq!(names(&by_gdp), vec!["Ghana", "Nigeria", "Antarctica", "France"]);

        let africa_by_pop = repo
            .list(
                &CountryFilter::new()
                    .with_region("Africa")
                    .unwrap()
                    .with_sort(CountrySort::PopDesc),
            )
            .await
            .unwrap();
        assert_eq!(names(&africa_by_pop), vec!["Nigeria", "Ghana"]);
    }

    #[tokio::test]
    async fn delete_by_name() {
        let repo = repo().await;
        repo.replace_all(&sample()).await.unwrap();

        assert!(!repo.delete_by_name("Atlantis").await.unwrap());
        assert_eq!(repo.status().await.unwrap().count, 4);

        assert!(repo.delete_by_name("France").await.unwrap());
        assert_eq!(repo.status().await.unwrap().count, 3);
        assert!(repo.get_by_name("France").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_database_persists_across_pools() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("countries.db").display());

        {
            let repo = SqliteCountryRepository::new(connect(&url).await.unwrap());
            repo.replace_all(&sample()).await.unwrap();
            repo.pool().close().await;
        }

        let repo = SqliteCountryRepository::new(connect(&url).await.unwrap());
        assert_eq!(repo.status().await.unwrap().count, 4);
    }
}
