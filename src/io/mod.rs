//! IO module for format-specific reading and writing operations.
//!
//! - `csv` - CSV format for the portfolio and summary tables
//! - `shp` - Shapefile format for zone geometry and attributes
//! - `xlsx` - XLSX export of the enriched portfolio

pub(crate) mod csv;
pub(crate) mod shp;
pub(crate) mod xlsx;
