//! The fully loaded dashboard data: five datasets, their world averages,
//! merged country names and the scatter comparison year.

use crate::aggregate::{compute_world_average, pick_scatter_year};
use crate::config::DashboardConfig;
use crate::loader::{RowFilter, load_wide_series_from};
use crate::models::{Metric, MetricDataset, Series};
use crate::source::DataSource;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::thread;

/// One value per dashboard metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerMetric<T> {
    pub taxes: T,
    pub expenditures: T,
    pub subsidies: T,
    pub disasters: T,
    pub temperature: T,
}

impl<T> PerMetric<T> {
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        Self {
            taxes: f(Metric::Taxes),
            expenditures: f(Metric::Expenditures),
            subsidies: f(Metric::Subsidies),
            disasters: f(Metric::Disasters),
            temperature: f(Metric::Temperature),
        }
    }

    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Taxes => &self.taxes,
            Metric::Expenditures => &self.expenditures,
            Metric::Subsidies => &self.subsidies,
            Metric::Disasters => &self.disasters,
            Metric::Temperature => &self.temperature,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Metric, &T) -> U) -> PerMetric<U> {
        PerMetric::from_fn(|m| f(m, self.get(m)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// Indicator and unit rows selected for `metric`.
pub fn row_filter(metric: Metric) -> RowFilter {
    RowFilter::new()
        .indicator(metric.indicator())
        .unit(metric.unit())
}

/// Immutable after construction; shared read-only by every view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardBundle {
    pub metrics: PerMetric<MetricDataset>,
    pub world: PerMetric<Series>,
    pub country_name_by_iso3: BTreeMap<String, String>,
    pub scatter_year: Option<i32>,
}

impl DashboardBundle {
    pub fn from_datasets(metrics: PerMetric<MetricDataset>) -> Self {
        let world = metrics.map(|_, ds| compute_world_average(&ds.by_iso3));

        // Taxes has the broadest coverage; temperature only fills the gaps.
        let mut country_name_by_iso3 = metrics.taxes.country_name_by_iso3.clone();
        for (iso3, name) in &metrics.temperature.country_name_by_iso3 {
            country_name_by_iso3
                .entry(iso3.clone())
                .or_insert_with(|| name.clone());
        }

        let scatter_year = pick_scatter_year(&metrics.taxes.by_iso3, &metrics.subsidies.by_iso3);

        Self {
            metrics,
            world,
            country_name_by_iso3,
            scatter_year,
        }
    }

    pub fn dataset(&self, metric: Metric) -> &MetricDataset {
        self.metrics.get(metric)
    }

    pub fn world_series(&self, metric: Metric) -> &Series {
        self.world.get(metric)
    }

    /// Display name for `iso3`, falling back to the code itself.
    pub fn country_name<'a>(&'a self, iso3: &'a str) -> &'a str {
        self.country_name_by_iso3
            .get(iso3)
            .map(String::as_str)
            .unwrap_or(iso3)
    }

    /// Metrics that have no row for `iso3`.
    pub fn missing_reference_metrics(&self, iso3: &str) -> Vec<Metric> {
        self.metrics
            .iter()
            .filter(|(_, ds)| !ds.contains(iso3))
            .map(|(m, _)| m)
            .collect()
    }
}

/// Load all five datasets concurrently and assemble the bundle.
///
/// Any failing source aborts the whole load; the first failure in metric
/// order is returned.
pub fn load_dashboard_from(sources: &PerMetric<DataSource>) -> Result<DashboardBundle> {
    let results: Vec<(Metric, Result<MetricDataset>)> = thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|(metric, source)| {
                let handle = scope.spawn(move || {
                    load_wide_series_from(source, &row_filter(metric))
                        .with_context(|| format!("loading {metric} from {}", source.describe()))
                });
                (metric, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(metric, handle)| {
                let res = handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("loader thread for {metric} panicked")));
                (metric, res)
            })
            .collect()
    });

    let mut loaded: BTreeMap<Metric, MetricDataset> = BTreeMap::new();
    for (metric, res) in results {
        loaded.insert(metric, res?);
    }
    let metrics = PerMetric::from_fn(|m| loaded.remove(&m).unwrap_or_default());
    Ok(DashboardBundle::from_datasets(metrics))
}

/// [`load_dashboard_from`] with sources taken from `config`, followed by the
/// reference-country check (warnings only).
pub fn load_dashboard(config: &DashboardConfig) -> Result<DashboardBundle> {
    let bundle = load_dashboard_from(&config.sources())?;
    for metric in bundle.missing_reference_metrics(&config.reference_iso3) {
        log::warn!(
            "{} series missing in {metric} dataset",
            config.reference_iso3
        );
    }
    log::info!(
        "dashboard loaded: {} named countries, scatter year {:?}",
        bundle.country_name_by_iso3.len(),
        bundle.scatter_year
    );
    Ok(bundle)
}
