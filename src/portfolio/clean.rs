//! Value cleaners for the free-form text the portfolio CSV arrives with.

use std::sync::LazyLock;

use anyhow::Result;
use polars::prelude::*;
use regex::Regex;

static NON_COORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]").expect("valid regex"));

static NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

/// Normalize a raw coordinate value: trim, unify dash and decimal symbols,
/// strip everything else non-numeric, then parse.
pub(crate) fn clean_coordinate(raw: &str) -> Option<f64> {
    let unified = raw.trim()
        .replace(['\u{2013}', '\u{2212}'], "-") // en dash, minus sign
        .replace(',', ".");
    NON_COORD.replace_all(&unified, "").parse().ok()
}

/// Normalize a raw TSI value: digits only, then parse.
pub(crate) fn clean_tsi(raw: &str) -> Option<f64> {
    let digits = NON_DIGIT.replace_all(raw.trim(), "");
    if digits.is_empty() { None } else { digits.parse().ok() }
}

/// Parse a floor count; `0` floors counts as `1` (ground floor only).
pub(crate) fn clean_floor_count(raw: &str) -> Option<f64> {
    let floors: f64 = raw.trim().parse().ok()?;
    Some(if floors == 0.0 { 1.0 } else { floors })
}

/// Run a scalar cleaner over a column, casting to String first so numeric
/// and text source columns behave identically.
pub(crate) fn clean_column(
    df: &DataFrame,
    name: &str,
    cleaner: impl Fn(&str) -> Option<f64>,
) -> Result<Float64Chunked> {
    let strings = df.column(name)?.cast(&DataType::String)?;
    let cleaned: Float64Chunked = strings.str()?.into_iter()
        .map(|value| value.and_then(&cleaner))
        .collect();
    Ok(cleaned.with_name(name.into()))
}
