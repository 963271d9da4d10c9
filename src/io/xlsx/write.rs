//! XLSX writing operations.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;

/// Write a DataFrame to a single-sheet XLSX workbook.
///
/// Cells keep their column's kind: strings as text, numeric dtypes as
/// numbers, nulls as empty cells.
pub(crate) fn write_xlsx(df: &DataFrame, sheet_name: &str, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, column) in df.get_columns().iter().enumerate() {
        let col = col as u16;
        worksheet.write_string(0, col, column.name().as_str())?;

        for (row, value) in column.as_materialized_series().iter().enumerate() {
            let row = row as u32 + 1;
            match value {
                AnyValue::Null => {}
                AnyValue::String(s) => { worksheet.write_string(row, col, s)?; }
                AnyValue::StringOwned(s) => { worksheet.write_string(row, col, s.as_str())?; }
                AnyValue::Float64(v) => { worksheet.write_number(row, col, v)?; }
                AnyValue::Float32(v) => { worksheet.write_number(row, col, v as f64)?; }
                AnyValue::Int64(v) => { worksheet.write_number(row, col, v as f64)?; }
                AnyValue::Int32(v) => { worksheet.write_number(row, col, v as f64)?; }
                AnyValue::UInt64(v) => { worksheet.write_number(row, col, v as f64)?; }
                AnyValue::UInt32(v) => { worksheet.write_number(row, col, v as f64)?; }
                AnyValue::Boolean(v) => { worksheet.write_boolean(row, col, v)?; }
                other => { worksheet.write_string(row, col, other.to_string())?; }
            }
        }
    }

    workbook.save(path)
        .with_context(|| format!("Failed to write XLSX to {}", path.display()))?;
    Ok(())
}
