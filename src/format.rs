//! Cell parsing and display formatting for metric values.

use num_format::{Locale, ToFormattedString};

const NO_DATA: &str = "No data";

/// Best-effort conversion of a raw cell to a number.
///
/// Missing input, blank text and anything that does not parse to a finite
/// `f64` yield `None`. Never panics.
pub fn parse_maybe_number(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// `12.345` -> `"12.35%"`.
pub fn format_percent(value: Option<f64>) -> String {
    match present(value) {
        Some(v) => format!("{v:.2}%"),
        None => NO_DATA.to_string(),
    }
}

/// Compact magnitude formatting (`1.50M`, `2.30K`, `12.3`, `0.42`).
pub fn format_number_short(value: Option<f64>) -> String {
    let Some(v) = present(value) else {
        return NO_DATA.to_string();
    };
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", v / 1e3)
    } else if abs >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

pub fn format_signed_number_short(value: Option<f64>) -> String {
    match present(value) {
        Some(v) if v > 0.0 => format!("+{}", format_number_short(Some(v))),
        other => format_number_short(other),
    }
}

/// Thousands-separated integer for counts in console output.
pub fn format_count(n: usize) -> String {
    n.to_formatted_string(&Locale::en)
}
