use crate::models::{CountryMetric, DataPoint, Series};
use std::collections::BTreeMap;

/// The selected country's series, or the world series when nothing is selected.
///
/// An unknown ISO3 yields an empty slice, never a missing value. A blank
/// selection counts as no selection.
pub fn get_series_for_country_or_world<'a>(
    by_iso3: &'a BTreeMap<String, CountryMetric>,
    world_series: &'a Series,
    iso3: Option<&str>,
) -> &'a [DataPoint] {
    match iso3.filter(|s| !s.is_empty()) {
        None => world_series.as_slice(),
        Some(code) => by_iso3
            .get(code)
            .map(|m| m.series.as_slice())
            .unwrap_or(&[]),
    }
}

/// Value recorded for `year`, if any. Linear scan; series are short.
pub fn get_value_at_year(series: &[DataPoint], year: Option<i32>) -> Option<f64> {
    let year = year?;
    series.iter().find(|d| d.year == year).map(|d| d.value)
}
