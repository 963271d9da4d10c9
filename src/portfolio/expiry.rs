//! Expiry-date normalization and the inforce filter.

use anyhow::{Result, ensure};
use chrono::NaiveDate;
use polars::prelude::*;

use crate::portfolio::columns;

/// Parse an expiry value: `dd/mm/yyyy` as uploaded, or ISO `yyyy-mm-dd` as
/// re-emitted by a previous run.
pub(crate) fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Re-emit the `EXPIRY DATE` column as ISO dates; unparseable values become
/// nulls. Without the column the frame passes through with a warning.
pub(crate) fn normalize_expiry(mut df: DataFrame, verbose: u8) -> Result<DataFrame> {
    if df.column(columns::EXPIRY_DATE).is_err() {
        eprintln!("warning: {} column not found; inforce filtering unavailable", columns::EXPIRY_DATE);
        return Ok(df);
    }

    let strings = df.column(columns::EXPIRY_DATE)?.cast(&DataType::String)?;
    let normalized: StringChunked = strings.str()?.into_iter()
        .map(|value| value.and_then(parse_expiry).map(|date| date.to_string()))
        .collect();
    let unparsed = normalized.null_count();

    df.replace_or_add(columns::EXPIRY_DATE.into(), normalized.into_series())?;

    if verbose > 0 {
        eprintln!("[portfolio] normalized expiry dates ({} unparseable)", unparsed);
    }
    Ok(df)
}

/// Keep only rows whose expiry date lies strictly after `cutoff`; rows with a
/// null expiry are dropped. Requires a normalized `EXPIRY DATE` column.
pub(crate) fn filter_inforce(df: DataFrame, cutoff: NaiveDate, verbose: u8) -> Result<DataFrame> {
    ensure!(
        df.column(columns::EXPIRY_DATE).is_ok(),
        "inforce filtering requires an {} column", columns::EXPIRY_DATE
    );

    let expiry = df.column(columns::EXPIRY_DATE)?.cast(&DataType::String)?;
    let mask: BooleanChunked = expiry.str()?.into_iter()
        .map(|value| value.and_then(parse_expiry).is_some_and(|date| date > cutoff))
        .collect();

    let before = df.height();
    let filtered = df.filter(&mask)?;
    if verbose > 0 {
        eprintln!("[portfolio] inforce filter (> {}) kept {} of {} rows", cutoff, filtered.height(), before);
    }
    Ok(filtered)
}
