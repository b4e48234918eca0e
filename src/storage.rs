use crate::bundle::DashboardBundle;
use crate::views::WORLD_LABEL;
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Code used for world-average rows in exports.
pub const WORLD_ISO3: &str = "WLD";

/// One observation in the long export table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TidyRow {
    pub metric: String,
    pub iso3: String,
    pub country: String,
    pub year: i32,
    pub value: f64,
}

/// Every country series followed by the world average, per metric.
pub fn tidy_rows(bundle: &DashboardBundle) -> Vec<TidyRow> {
    let mut out = Vec::new();
    for (metric, ds) in bundle.metrics.iter() {
        for m in ds.by_iso3.values() {
            out.extend(m.series.iter().map(|d| TidyRow {
                metric: metric.key().to_string(),
                iso3: m.iso3.clone(),
                country: m.country.clone(),
                year: d.year,
                value: d.value,
            }));
        }
        out.extend(bundle.world_series(metric).iter().map(|d| TidyRow {
            metric: metric.key().to_string(),
            iso3: WORLD_ISO3.to_string(),
            country: WORLD_LABEL.to_string(),
            year: d.year,
            value: d.value,
        }));
    }
    out
}

/// Prefix cells a spreadsheet would evaluate as a formula.
fn defuse(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}

/// Save the tidy table as CSV with header.
pub fn save_csv<P: AsRef<Path>>(bundle: &DashboardBundle, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["metric", "iso3", "country", "year", "value"])?;
    for r in tidy_rows(bundle) {
        wtr.write_record([
            defuse(&r.metric),
            defuse(&r.iso3),
            defuse(&r.country),
            r.year.to_string(),
            r.value.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the tidy table as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(bundle: &DashboardBundle, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&tidy_rows(bundle))?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_starters_are_prefixed() {
        assert_eq!(defuse("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(defuse("@foo"), "'@foo");
        assert_eq!(defuse("-1"), "'-1");
        assert_eq!(defuse("Austria"), "Austria");
        assert_eq!(defuse(""), "");
    }
}
