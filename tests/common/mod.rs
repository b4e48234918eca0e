#![allow(dead_code)]

use climate_dash::bundle::{PerMetric, load_dashboard_from};
use climate_dash::{DashboardBundle, DataSource, Metric};
use std::fs;
use std::path::Path;

const HEADER: &str = "ObjectId,Country,ISO2,ISO3,Indicator,Unit,Source,1990,2000,2001,2002,2003";

fn line(iso2: &str, iso3: &str, country: &str, metric: Metric, unit: &str, cells: [&str; 5]) -> String {
    format!(
        "1,\"{country}\",{iso2},{iso3},\"{}\",{unit},IMF,{}",
        metric.indicator(),
        cells.join(",")
    )
}

/// CSV text for one metric, including rows the loader has to reject.
pub fn fixture_csv(metric: Metric) -> String {
    let unit = metric.unit();
    let rows: Vec<String> = match metric {
        Metric::Taxes => vec![
            line("AT", "AUT", "Austria", metric, unit, ["", "2.0", "2.2", "2.4", "2.5"]),
            line("DE", "DEU", "Germany", metric, unit, ["", "1.0", "1.2", "1.4", ""]),
            line("FR", "FRA", "France", metric, unit, ["", "", "3.0", "3.2", ""]),
            line("AT", "AUT", "Austria", metric, "Domestic currency", ["999", "999", "999", "999", "999"]),
            line("", "G20", "G20", metric, unit, ["", "9", "9", "9", "9"]),
        ],
        Metric::Expenditures => vec![
            line("AT", "AUT", "Austria", metric, unit, ["", "0.5", "0.6", "0.7", ""]),
            line("DE", "DEU", "Germany", metric, unit, ["", "", "0.8", "0.9", ""]),
        ],
        Metric::Subsidies => vec![
            line("AT", "AUT", "Austria", metric, unit, ["", "", "1.5", "1.6", ""]),
            line("DE", "DEU", "Germany", metric, unit, ["", "", "2.5", "2.6", ""]),
            line("FR", "FRA", "France", metric, unit, ["", "", "", "0.5", ""]),
        ],
        Metric::Disasters => vec![
            line("AT", "AUT", "Austria", metric, unit, ["", "1", "", "", "2"]),
            line("DE", "DEU", "Germany", metric, unit, ["", "3", "", "", ""]),
        ],
        Metric::Temperature => vec![
            line("AT", "AUT", "Republic of Austria", metric, unit, ["0.1", "0.8", "", "", "1.2"]),
            line("IT", "ITA", "Italy", metric, unit, ["", "0.9", "", "", ""]),
        ],
    };
    let mut text = String::from(HEADER);
    text.push('\n');
    for r in rows {
        text.push_str(&r);
        text.push('\n');
    }
    text
}

/// Write all five tables under their default file names.
pub fn write_fixture(dir: &Path) {
    for metric in Metric::ALL {
        fs::write(dir.join(metric.default_file_name()), fixture_csv(metric)).unwrap();
    }
}

pub fn fixture_bundle() -> DashboardBundle {
    let sources = PerMetric::from_fn(|m| DataSource::Inline(fixture_csv(m)));
    load_dashboard_from(&sources).unwrap()
}
