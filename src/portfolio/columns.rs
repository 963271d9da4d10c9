//! Column names of the portfolio CSV and of the enrichment outputs.

pub const LONGITUDE: &str = "Longitude";
pub const LATITUDE: &str = "Latitude";
pub const OCCUPANCY: &str = "Occupancy Category";
pub const FLOOR_COUNT: &str = "Floor Count";
pub const TSI: &str = "TSI";
pub const UY: &str = "UY";
pub const EXPIRY_DATE: &str = "EXPIRY DATE";

// Columns appended by the enrichment pipeline.
pub const GRID_CODE: &str = "gridcode";
pub const RISK_CATEGORY: &str = "Risk Category";
pub const RATE: &str = "Rate";
pub const PML: &str = "PML";
