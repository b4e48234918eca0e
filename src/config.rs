//! Where the five tables live and which country is the fixed reference.
//!
//! Loaded from an optional JSON file; every field has a default:
//!
//! ```json
//! {
//!   "data_location": "https://example.org/dashboard/data",
//!   "reference_iso3": "AUT",
//!   "files": { "temperature": "temperature_v2.csv" }
//! }
//! ```

use crate::bundle::PerMetric;
use crate::error::LoadError;
use crate::models::Metric;
use crate::source::DataSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_DATA_LOCATION: &str = "data";
pub const DEFAULT_REFERENCE_ISO3: &str = "AUT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory or `http(s)://` base the file names are joined onto.
    pub data_location: String,
    pub reference_iso3: String,
    /// Per-metric file name overrides; metrics not listed use their default file.
    pub files: BTreeMap<Metric, String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_location: DEFAULT_DATA_LOCATION.to_string(),
            reference_iso3: DEFAULT_REFERENCE_ISO3.to_string(),
            files: BTreeMap::new(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoadError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn file_name(&self, metric: Metric) -> &str {
        self.files
            .get(&metric)
            .map(String::as_str)
            .unwrap_or_else(|| metric.default_file_name())
    }

    pub fn sources(&self) -> PerMetric<DataSource> {
        PerMetric::from_fn(|metric| DataSource::resolve(&self.data_location, self.file_name(metric)))
    }
}
