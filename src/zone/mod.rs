mod crs;
mod layer;

pub use crs::ZoneCrs;
pub use layer::ZoneLayer;
