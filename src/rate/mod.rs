mod category;
mod table;

pub use category::{FloorBucket, Occupancy, RiskCategory};
pub use table::RateTable;
