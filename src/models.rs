use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// One line of a wide-format table: column name -> raw cell text.
pub type RawRow = HashMap<String, String>;

/// One observation inside a finalized series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub year: i32,
    pub value: f64,
}

impl DataPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Ascending by year, no duplicate years.
pub type Series = Vec<DataPoint>;

/// A single country's row of one dataset after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryMetric {
    pub iso3: String,
    pub iso2: String,
    /// Display name as written in the source table.
    pub country: String,
    pub indicator: String,
    pub unit: String,
    pub series: Series,
}

/// Result of loading one indicator/unit combination.
///
/// `BTreeMap` keeps iteration order stable (alphabetical by ISO3), which the
/// aggregations and exports rely on for reproducible output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDataset {
    pub by_iso3: BTreeMap<String, CountryMetric>,
    pub country_name_by_iso3: BTreeMap<String, String>,
}

impl MetricDataset {
    pub fn get(&self, iso3: &str) -> Option<&CountryMetric> {
        self.by_iso3.get(iso3)
    }

    pub fn contains(&self, iso3: &str) -> bool {
        self.by_iso3.contains_key(iso3)
    }

    pub fn len(&self) -> usize {
        self.by_iso3.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_iso3.is_empty()
    }
}

/// The five datasets shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Taxes,
    Expenditures,
    Subsidies,
    Disasters,
    Temperature,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Taxes,
        Metric::Expenditures,
        Metric::Subsidies,
        Metric::Disasters,
        Metric::Temperature,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Taxes => "taxes",
            Metric::Expenditures => "expenditures",
            Metric::Subsidies => "subsidies",
            Metric::Disasters => "disasters",
            Metric::Temperature => "temperature",
        }
    }

    /// Exact `Indicator` column value selected from the source table.
    pub fn indicator(self) -> &'static str {
        match self {
            Metric::Taxes => "Environmental Taxes",
            Metric::Expenditures => "Expenditure on environment protection",
            Metric::Subsidies => "Fossil Fuel Subsidies - Total Implicit and Explicit",
            Metric::Disasters => {
                "Climate related disasters frequency, Number of Disasters: TOTAL"
            }
            Metric::Temperature => {
                "Temperature change with respect to a baseline climatology, corresponding to the period 1951-1980"
            }
        }
    }

    /// Exact `Unit` column value selected from the source table.
    /// Money-like metrics use percent of GDP so countries are comparable.
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Taxes | Metric::Expenditures | Metric::Subsidies => "Percent of GDP",
            Metric::Disasters => "Number of",
            Metric::Temperature => "Degree Celsius",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            Metric::Taxes => "07_Environmental_Taxes.csv",
            Metric::Expenditures => "08_Environmental_Protection_Expenditures.csv",
            Metric::Subsidies => "09_Fossil_Fuel_Subsidies.csv",
            Metric::Disasters => "14_Climate-related_Disasters_Frequency.csv",
            Metric::Temperature => "23_Annual_Surface_Temperature_Change.csv",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Taxes => "Environmental taxes (% of GDP)",
            Metric::Expenditures => "Environmental protection expenditure (% of GDP)",
            Metric::Subsidies => "Fossil fuel subsidies (% of GDP)",
            Metric::Disasters => "Climate disaster frequency (#/year)",
            Metric::Temperature => "Temperature anomaly (°C)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Time-range truncation applied to multi-year line displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndicatorWindow {
    #[default]
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "20y")]
    Last20,
    #[serde(rename = "30y")]
    Last30,
    #[serde(rename = "35y")]
    Last35,
}

impl IndicatorWindow {
    /// Number of trailing years kept, `None` for the full range.
    pub fn years(self) -> Option<i32> {
        match self {
            IndicatorWindow::Full => None,
            IndicatorWindow::Last20 => Some(20),
            IndicatorWindow::Last30 => Some(30),
            IndicatorWindow::Last35 => Some(35),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorWindow::Full => "full",
            IndicatorWindow::Last20 => "20y",
            IndicatorWindow::Last30 => "30y",
            IndicatorWindow::Last35 => "35y",
        }
    }
}

impl fmt::Display for IndicatorWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(IndicatorWindow::Full),
            "20y" => Ok(IndicatorWindow::Last20),
            "30y" => Ok(IndicatorWindow::Last30),
            "35y" => Ok(IndicatorWindow::Last35),
            other => Err(format!(
                "unknown indicator window '{other}', expected full, 20y, 30y or 35y"
            )),
        }
    }
}
