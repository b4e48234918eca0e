use crate::bundle::DashboardBundle;
use crate::models::Metric;
use serde::{Deserialize, Serialize};

/// Coverage summary for one metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSummary {
    pub metric: Metric,
    /// Countries with a row in the dataset.
    pub countries: usize,
    /// Countries whose row produced at least one value.
    pub with_data: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    /// World average in `last_year`.
    pub latest_world: Option<f64>,
}

/// One summary per metric, in dashboard order.
pub fn metric_summaries(bundle: &DashboardBundle) -> Vec<MetricSummary> {
    bundle
        .metrics
        .iter()
        .map(|(metric, ds)| {
            let world = bundle.world_series(metric);
            MetricSummary {
                metric,
                countries: ds.len(),
                with_data: ds.by_iso3.values().filter(|m| !m.series.is_empty()).count(),
                first_year: world.first().map(|d| d.year),
                last_year: world.last().map(|d| d.year),
                latest_world: world.last().map(|d| d.value),
            }
        })
        .collect()
}
