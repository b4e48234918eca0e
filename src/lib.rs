//! climate_dash
//!
//! Data layer of a climate-policy comparison dashboard. Wide-format tables
//! (one column per year) of environmental taxes, environmental protection
//! expenditure, fossil-fuel subsidies, climate-disaster frequency and surface
//! temperature change are reshaped into per-country series, averaged into
//! world series, and linked to the charts through a small selection store.
//! Pairs with the `climate-dash` CLI.
//!
//! ### Features
//! - Best-effort parsing of sparse statistical tables (blank and non-numeric cells dropped)
//! - Duplicate country rows resolved by longest series, first seen on ties
//! - Unweighted world averages and the best common year for the scatter chart
//! - Synchronous selection store with change detection and subscriber notification
//! - View models for the scatter, small-multiples, discrepancy and bar charts
//! - Tidy CSV/JSON export
//!
//! ### Example
//! ```no_run
//! use climate_dash::{DashboardConfig, SelectionPatch, SelectionState, Store};
//! use climate_dash::{bundle, views};
//!
//! let config = DashboardConfig::default();
//! let data = bundle::load_dashboard(&config)?;
//! let store = Store::new(SelectionState::default());
//! let _sub = store.subscribe(move |state| {
//!     let view = views::dashboard_view(&data, state, &config.reference_iso3);
//!     println!("comparing against {}", view.comparison_label);
//! });
//! store.set_state(SelectionPatch::new().country("DEU"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod access;
pub mod aggregate;
pub mod bundle;
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod models;
pub mod rows;
pub mod source;
pub mod stats;
pub mod storage;
pub mod store;
pub mod views;

pub use bundle::{DashboardBundle, PerMetric};
pub use config::DashboardConfig;
pub use error::LoadError;
pub use loader::RowFilter;
pub use models::{CountryMetric, DataPoint, IndicatorWindow, Metric, MetricDataset, Series};
pub use source::DataSource;
pub use store::{SelectionPatch, SelectionState, Store, WeakStore};
