//! Summary statistics for the refresh image.

use crate::domain::entities::{Country, listing_order};
use crate::domain::value_objects::{CountrySort, Timestamp};
use crate::infrastructure::rendering::SummaryStats;

/// Default number of countries shown on the summary image.
pub const DEFAULT_TOP_N: usize = 5;

/// Builds the summary for a freshly written record set.
///
/// `top` holds the `top_n` largest GDP estimates, largest first, ties by
/// name. Countries without an estimate never appear in it.
#[must_use]
pub fn build_summary(
    countries: &[Country],
    top_n: usize,
    refreshed_at: Timestamp,
) -> SummaryStats {
    let mut ranked: Vec<&Country> = countries
        .iter()
        .filter(|c| c.estimated_gdp().is_some())
        .collect();
    ranked.sort_by(|a, b| listing_order(Some(CountrySort::GdpDesc), a, b));

    let top = ranked
        .into_iter()
        .take(top_n)
        .filter_map(|c| c.estimated_gdp().map(|gdp| (c.name().to_string(), gdp)))
        .collect();

    SummaryStats {
        total: countries.len() as u64,
        top,
        refreshed_at,
    }
}
