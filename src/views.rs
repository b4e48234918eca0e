//! Data behind the four linked charts.
//!
//! Each function derives what one chart draws from the bundle and the current
//! selection. Nothing here knows about pixels: scaling, axes and hit-testing
//! belong to whatever renders these values. Views recompute everything on
//! every store notification.

use crate::access::{get_series_for_country_or_world, get_value_at_year};
use crate::bundle::DashboardBundle;
use crate::models::{DataPoint, IndicatorWindow, Metric, Series};
use crate::store::SelectionState;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const WORLD_LABEL: &str = "World average";

/// Label of the comparison side: the selected country's name, or the world average.
pub fn comparison_label(names: &BTreeMap<String, String>, selected: Option<&str>) -> String {
    match selected.filter(|s| !s.is_empty()) {
        Some(iso3) => names.get(iso3).cloned().unwrap_or_else(|| iso3.to_string()),
        None => WORLD_LABEL.to_string(),
    }
}

// ---------- scatter ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DotRole {
    Reference,
    Selected,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub iso3: String,
    pub country: String,
    /// x axis
    pub subsidies: f64,
    /// y axis
    pub taxes: f64,
    pub role: DotRole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterView {
    pub year: Option<i32>,
    pub points: Vec<ScatterPoint>,
}

fn dot_role(iso3: &str, selected: Option<&str>, reference_iso3: &str) -> DotRole {
    if iso3 == reference_iso3 {
        DotRole::Reference
    } else if Some(iso3) == selected {
        DotRole::Selected
    } else {
        DotRole::Other
    }
}

/// Countries with both a taxes and a subsidies value at `year`, as
/// `(iso3, name, subsidies, taxes)`.
fn scatter_rows(bundle: &DashboardBundle, year: Option<i32>) -> Vec<(&str, &str, f64, f64)> {
    let subsidies = &bundle.metrics.subsidies.by_iso3;
    bundle
        .metrics
        .taxes
        .by_iso3
        .iter()
        .filter_map(|(iso3, tax_row)| {
            let sub_row = subsidies.get(iso3)?;
            let tax = get_value_at_year(&tax_row.series, year)?;
            let sub = get_value_at_year(&sub_row.series, year)?;
            Some((iso3.as_str(), tax_row.country.as_str(), sub, tax))
        })
        .collect()
}

/// One dot per country at the bundle's scatter year; empty when there is none.
pub fn scatter_view(
    bundle: &DashboardBundle,
    state: &SelectionState,
    reference_iso3: &str,
) -> ScatterView {
    let selected = state.selected_country();
    let points = scatter_rows(bundle, bundle.scatter_year)
        .into_iter()
        .map(|(iso3, country, subsidies, taxes)| ScatterPoint {
            iso3: iso3.to_string(),
            country: country.to_string(),
            subsidies,
            taxes,
            role: dot_role(iso3, selected, reference_iso3),
        })
        .collect();
    ScatterView {
        year: bundle.scatter_year,
        points,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOption {
    pub iso3: String,
    pub name: String,
}

/// Selectable countries, kept in line with the scatter dots, sorted by name.
pub fn search_options(bundle: &DashboardBundle) -> Vec<SearchOption> {
    let mut out: Vec<SearchOption> = scatter_rows(bundle, bundle.scatter_year)
        .into_iter()
        .map(|(iso3, name, _, _)| SearchOption {
            iso3: iso3.to_string(),
            name: name.to_string(),
        })
        .collect();
    out.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

// ---------- small multiples ----------

fn year_extent(series: &[DataPoint]) -> Option<(i32, i32)> {
    let min = series.iter().map(|d| d.year).min()?;
    let max = series.iter().map(|d| d.year).max()?;
    Some((min, max))
}

/// First year shown for a pair of series under `window`.
///
/// `None` for the full window or when both series are empty. Otherwise
/// `max(min_year, max_year - N)` over the combined extent.
pub fn window_start(a: &[DataPoint], b: &[DataPoint], window: IndicatorWindow) -> Option<i32> {
    let span = window.years()?;
    let extents: Vec<(i32, i32)> = [year_extent(a), year_extent(b)].into_iter().flatten().collect();
    let min_year = extents.iter().map(|e| e.0).min()?;
    let max_year = extents.iter().map(|e| e.1).max()?;
    Some(min_year.max(max_year - span))
}

fn clip(series: &[DataPoint], start: Option<i32>) -> Series {
    match start {
        Some(start) => series.iter().filter(|d| d.year >= start).copied().collect(),
        None => series.to_vec(),
    }
}

/// Both series trimmed to the same window start.
pub fn clip_to_window(a: &[DataPoint], b: &[DataPoint], window: IndicatorWindow) -> (Series, Series) {
    let start = window_start(a, b, window);
    (clip(a, start), clip(b, start))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPair {
    pub metric: Metric,
    pub title: String,
    pub reference: Series,
    pub comparison: Series,
    pub comparison_label: String,
}

/// Metrics shown as stacked line charts, top to bottom.
pub const SMALL_MULTIPLE_METRICS: [Metric; 3] =
    [Metric::Temperature, Metric::Disasters, Metric::Taxes];

pub fn series_pair(
    bundle: &DashboardBundle,
    state: &SelectionState,
    reference_iso3: &str,
    metric: Metric,
) -> SeriesPair {
    let selected = state.selected_country();
    let dataset = bundle.dataset(metric);
    let reference = dataset
        .get(reference_iso3)
        .map(|m| m.series.as_slice())
        .unwrap_or(&[]);
    let comparison =
        get_series_for_country_or_world(&dataset.by_iso3, bundle.world_series(metric), selected);
    let (reference, comparison) = clip_to_window(reference, comparison, state.indicator_window);

    SeriesPair {
        metric,
        title: metric.title().to_string(),
        reference,
        comparison,
        comparison_label: comparison_label(&bundle.country_name_by_iso3, selected),
    }
}

pub fn small_multiples(
    bundle: &DashboardBundle,
    state: &SelectionState,
    reference_iso3: &str,
) -> Vec<SeriesPair> {
    SMALL_MULTIPLE_METRICS
        .into_iter()
        .map(|m| series_pair(bundle, state, reference_iso3, m))
        .collect()
}

// ---------- discrepancy ----------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscrepancyPoint {
    pub year: i32,
    /// taxes minus expenditures
    pub value: f64,
    pub taxes: f64,
    pub expenditures: f64,
}

/// `taxes - expenditures` for every year both series report.
pub fn discrepancy_series(taxes: &[DataPoint], expenditures: &[DataPoint]) -> Vec<DiscrepancyPoint> {
    let years: BTreeSet<i32> = taxes
        .iter()
        .chain(expenditures.iter())
        .map(|d| d.year)
        .collect();

    years
        .into_iter()
        .filter_map(|year| {
            let t = get_value_at_year(taxes, Some(year))?;
            let e = get_value_at_year(expenditures, Some(year))?;
            Some(DiscrepancyPoint {
                year,
                value: t - e,
                taxes: t,
                expenditures: e,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscrepancyView {
    pub reference: Vec<DiscrepancyPoint>,
    pub comparison: Vec<DiscrepancyPoint>,
    pub comparison_label: String,
    /// Vertical marker position, if a year is selected.
    pub marker_year: Option<i32>,
}

pub fn discrepancy_view(
    bundle: &DashboardBundle,
    state: &SelectionState,
    reference_iso3: &str,
) -> DiscrepancyView {
    let selected = state.selected_country();
    let (ref_taxes, ref_exp) = reference_taxes_expenditures(bundle, reference_iso3);
    let (cmp_taxes, cmp_exp) = comparison_taxes_expenditures(bundle, selected);

    DiscrepancyView {
        reference: discrepancy_series(ref_taxes, ref_exp),
        comparison: discrepancy_series(cmp_taxes, cmp_exp),
        comparison_label: comparison_label(&bundle.country_name_by_iso3, selected),
        marker_year: state.selected_year,
    }
}

fn reference_taxes_expenditures<'a>(
    bundle: &'a DashboardBundle,
    reference_iso3: &str,
) -> (&'a [DataPoint], &'a [DataPoint]) {
    let series_of = move |metric: Metric| {
        bundle
            .dataset(metric)
            .get(reference_iso3)
            .map(|m| m.series.as_slice())
            .unwrap_or(&[])
    };
    (series_of(Metric::Taxes), series_of(Metric::Expenditures))
}

fn comparison_taxes_expenditures<'a>(
    bundle: &'a DashboardBundle,
    selected: Option<&str>,
) -> (&'a [DataPoint], &'a [DataPoint]) {
    let series_of = move |metric: Metric| {
        get_series_for_country_or_world(
            &bundle.dataset(metric).by_iso3,
            bundle.world_series(metric),
            selected,
        )
    };
    (series_of(Metric::Taxes), series_of(Metric::Expenditures))
}

// ---------- grouped bars ----------

/// Latest year in which both series have a value.
pub fn default_bar_year(taxes: &[DataPoint], expenditures: &[DataPoint]) -> Option<i32> {
    let years: BTreeSet<i32> = taxes
        .iter()
        .chain(expenditures.iter())
        .map(|d| d.year)
        .collect();
    years.into_iter().rev().find(|&y| {
        get_value_at_year(taxes, Some(y)).is_some()
            && get_value_at_year(expenditures, Some(y)).is_some()
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub label: String,
    /// `None` for the world average group.
    pub iso3: Option<String>,
    pub taxes: Option<f64>,
    pub expenditures: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarsView {
    pub year: Option<i32>,
    pub groups: Vec<BarGroup>,
}

/// Taxes vs expenditures at the selected year (or the reference country's
/// latest complete year), for the reference and the comparison.
pub fn bars_view(
    bundle: &DashboardBundle,
    state: &SelectionState,
    reference_iso3: &str,
) -> BarsView {
    let selected = state.selected_country();
    let (ref_taxes, ref_exp) = reference_taxes_expenditures(bundle, reference_iso3);
    let (cmp_taxes, cmp_exp) = comparison_taxes_expenditures(bundle, selected);

    let year = state
        .selected_year
        .or_else(|| default_bar_year(ref_taxes, ref_exp));

    let groups = vec![
        BarGroup {
            label: bundle.country_name(reference_iso3).to_string(),
            iso3: Some(reference_iso3.to_string()),
            taxes: get_value_at_year(ref_taxes, year),
            expenditures: get_value_at_year(ref_exp, year),
        },
        BarGroup {
            label: comparison_label(&bundle.country_name_by_iso3, selected),
            iso3: selected.map(str::to_string),
            taxes: get_value_at_year(cmp_taxes, year),
            expenditures: get_value_at_year(cmp_exp, year),
        },
    ];

    BarsView { year, groups }
}

// ---------- everything at once ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub state: SelectionState,
    pub reference_label: String,
    pub comparison_label: String,
    pub scatter: ScatterView,
    pub small_multiples: Vec<SeriesPair>,
    pub discrepancy: DiscrepancyView,
    pub bars: BarsView,
}

pub fn dashboard_view(
    bundle: &DashboardBundle,
    state: &SelectionState,
    reference_iso3: &str,
) -> DashboardView {
    DashboardView {
        state: state.clone(),
        reference_label: bundle.country_name(reference_iso3).to_string(),
        comparison_label: comparison_label(
            &bundle.country_name_by_iso3,
            state.selected_country(),
        ),
        scatter: scatter_view(bundle, state, reference_iso3),
        small_multiples: small_multiples(bundle, state, reference_iso3),
        discrepancy: discrepancy_view(bundle, state, reference_iso3),
        bars: bars_view(bundle, state, reference_iso3),
    }
}
