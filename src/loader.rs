//! Dataset loading: filter wide-format rows and reshape them per country.

use crate::error::LoadError;
use crate::models::{CountryMetric, MetricDataset, RawRow};
use crate::rows::{cell, is_country_row, row_to_series};
use crate::source::DataSource;
use std::fmt;
use std::sync::Arc;

/// Extra row check applied after the indicator and unit filters.
pub type RowPredicate = Arc<dyn Fn(&RawRow) -> bool + Send + Sync>;

/// Which rows of a table belong to one metric.
///
/// `indicator` and `unit` are exact, case-sensitive matches against the
/// trimmed column values; `None` disables that check.
#[derive(Clone, Default)]
pub struct RowFilter {
    pub indicator: Option<String>,
    pub unit: Option<String>,
    pub predicate: Option<RowPredicate>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indicator(mut self, indicator: impl Into<String>) -> Self {
        self.indicator = Some(indicator.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&RawRow) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(f));
        self
    }

    /// Country check first, then indicator, unit and the custom predicate.
    pub fn matches(&self, row: &RawRow) -> bool {
        if !is_country_row(row) {
            return false;
        }
        if let Some(want) = &self.indicator {
            if cell(row, "Indicator") != want.as_str() {
                return false;
            }
        }
        if let Some(want) = &self.unit {
            if cell(row, "Unit") != want.as_str() {
                return false;
            }
        }
        match &self.predicate {
            Some(pred) => pred(row),
            None => true,
        }
    }
}

impl fmt::Debug for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFilter")
            .field("indicator", &self.indicator)
            .field("unit", &self.unit)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Reshape raw rows into one [`CountryMetric`] per ISO3.
///
/// Duplicate ISO3 rows: the row with the strictly longer series replaces the
/// stored one, so on equal length the first-seen row stays. Display names do
/// not follow that rule; the last matching row's `Country` wins.
pub fn load_wide_series(rows: &[RawRow], filter: &RowFilter) -> MetricDataset {
    let mut out = MetricDataset::default();

    for row in rows.iter().filter(|r| filter.matches(r)) {
        let iso3 = cell(row, "ISO3").to_string();
        let country = cell(row, "Country").to_string();

        out.country_name_by_iso3
            .insert(iso3.clone(), country.clone());

        let series = row_to_series(row);
        let replace = match out.by_iso3.get(&iso3) {
            Some(existing) => series.len() > existing.series.len(),
            None => true,
        };
        if replace {
            out.by_iso3.insert(
                iso3.clone(),
                CountryMetric {
                    iso3,
                    iso2: cell(row, "ISO2").to_string(),
                    country,
                    indicator: cell(row, "Indicator").to_string(),
                    unit: cell(row, "Unit").to_string(),
                    series,
                },
            );
        }
    }

    out
}

/// Read `source` and reshape it with [`load_wide_series`].
pub fn load_wide_series_from(
    source: &DataSource,
    filter: &RowFilter,
) -> Result<MetricDataset, LoadError> {
    let rows = source.read_rows()?;
    let dataset = load_wide_series(&rows, filter);
    log::debug!(
        "{}: {} rows read, {} countries kept",
        source.describe(),
        rows.len(),
        dataset.len()
    );
    Ok(dataset)
}
