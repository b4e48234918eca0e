//! Row classification: which raw rows are countries, and which columns are years.
//!
//! This is the only place that looks at column names. Everything downstream
//! sees typed [`Series`] values.

use crate::format::parse_maybe_number;
use crate::models::{DataPoint, RawRow, Series};
use regex::Regex;
use std::sync::LazyLock;

static ISO3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("static ISO3 pattern"));
static YEAR_COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("static year pattern"));

/// Trimmed value of a named column, empty when the column is absent.
pub fn cell<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.get(column).map(|s| s.trim()).unwrap_or("")
}

/// True when `ISO3` is exactly three uppercase ASCII letters after trimming.
/// Region and aggregate rows use other code shapes and fail this check.
pub fn is_country_row(row: &RawRow) -> bool {
    ISO3_RE.is_match(cell(row, "ISO3"))
}

fn year_columns(row: &RawRow) -> Vec<(i32, &str)> {
    let mut cols: Vec<(i32, &str)> = row
        .keys()
        .filter(|k| YEAR_COLUMN_RE.is_match(k))
        .filter_map(|k| k.parse::<i32>().ok().map(|y| (y, k.as_str())))
        .collect();
    cols.sort_unstable_by_key(|(year, _)| *year);
    cols
}

/// All four-digit column names as integers, ascending.
pub fn extract_year_columns(row: &RawRow) -> Vec<i32> {
    year_columns(row).into_iter().map(|(year, _)| year).collect()
}

/// Parsed year cells in ascending year order; empty and non-numeric cells are dropped.
pub fn row_to_series(row: &RawRow) -> Series {
    year_columns(row)
        .into_iter()
        .filter_map(|(year, column)| {
            let raw = row.get(column).map(String::as_str);
            parse_maybe_number(raw).map(|value| DataPoint { year, value })
        })
        .collect()
}
