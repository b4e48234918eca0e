//! Cross-country aggregation: world averages and the scatter comparison year.

use crate::access::get_value_at_year;
use crate::models::{CountryMetric, DataPoint, Series};
use std::collections::{BTreeMap, BTreeSet};

/// Union of every year present in any country's series.
pub fn collect_years(by_iso3: &BTreeMap<String, CountryMetric>) -> BTreeSet<i32> {
    by_iso3
        .values()
        .flat_map(|m| m.series.iter().map(|d| d.year))
        .collect()
}

/// Unweighted mean per year across all countries that report that year.
///
/// Years nobody reports are absent from the output rather than zero.
pub fn compute_world_average(by_iso3: &BTreeMap<String, CountryMetric>) -> Series {
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for metric in by_iso3.values() {
        for d in &metric.series {
            let slot = sums.entry(d.year).or_insert((0.0, 0));
            slot.0 += d.value;
            slot.1 += 1;
        }
    }

    sums.into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(year, (sum, count))| DataPoint {
            year,
            value: sum / count as f64,
        })
        .collect()
}

/// Countries that have a value for `year` in both datasets.
pub fn count_countries_with_both(
    left: &BTreeMap<String, CountryMetric>,
    right: &BTreeMap<String, CountryMetric>,
    year: i32,
) -> usize {
    let (small, large) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    small
        .iter()
        .filter(|(iso3, a)| {
            large.get(*iso3).is_some_and(|b| {
                get_value_at_year(&a.series, Some(year)).is_some()
                    && get_value_at_year(&b.series, Some(year)).is_some()
            })
        })
        .count()
}

/// Year with the most countries reporting both taxes and subsidies.
///
/// Only years present in both datasets are candidates. Ties go to the later
/// year. `None` when the datasets share no year.
pub fn pick_scatter_year(
    taxes_by_iso3: &BTreeMap<String, CountryMetric>,
    subsidies_by_iso3: &BTreeMap<String, CountryMetric>,
) -> Option<i32> {
    let tax_years = collect_years(taxes_by_iso3);
    let sub_years = collect_years(subsidies_by_iso3);

    let mut best: Option<(i32, usize)> = None;
    // BTreeSet intersection is ascending, so `>=` lets later years win ties.
    for &year in tax_years.intersection(&sub_years) {
        let count = count_countries_with_both(taxes_by_iso3, subsidies_by_iso3, year);
        match best {
            Some((_, best_count)) if count < best_count => {}
            _ => best = Some((year, count)),
        }
    }
    best.map(|(year, _)| year)
}
