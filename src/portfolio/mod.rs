pub mod columns;

mod clean;
mod expiry;
mod read;

pub(crate) use clean::*;
pub(crate) use expiry::*;
pub(crate) use read::*;
