//! Portfolio CSV loading.

use std::path::Path;

use anyhow::{Result, bail};
use polars::frame::DataFrame;

use crate::io::csv;

/// Reads the portfolio CSV, trimming whitespace from column headers.
pub(crate) fn load_portfolio(path: &Path) -> Result<DataFrame> {
    let mut df = csv::read_csv(path)?;

    let renames: Vec<(String, String)> = df.get_column_names().iter()
        .filter(|name| name.as_str() != name.as_str().trim())
        .map(|name| (name.to_string(), name.as_str().trim().to_string()))
        .collect();
    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }

    Ok(df)
}

/// Error unless the frame carries every listed column.
pub(crate) fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    let missing: Vec<&str> = required.iter()
        .filter(|&&name| df.column(name).is_err())
        .copied()
        .collect();
    if !missing.is_empty() {
        bail!("missing required columns: {}", missing.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn require_columns_lists_every_missing_name() {
        let df = df! { "Longitude" => [1.0] }.unwrap();
        assert!(require_columns(&df, &["Longitude"]).is_ok());

        let err = require_columns(&df, &["Longitude", "Latitude", "TSI"]).unwrap_err();
        let message = format!("{err}");
        assert!(message.contains("Latitude"));
        assert!(message.contains("TSI"));
        assert!(!message.contains("Longitude,"));
    }
}
