//! Stats module - per-row rates and dataset totals

mod rates;
mod summary;

pub use rates::{rate, RateCalculator};
pub use summary::{format_count, Summary};
