//! Data module - CSV loading and table processing

mod loader;
mod processor;
mod schema;

pub use loader::{DataLoader, LoaderError};
pub use processor::{DataProcessor, MetricValue, ProcessorError};
pub use schema::{
    label, AccidentRecord, AccidentTable, RegionTotals, ACCIDENTS, FATALITIES, FATALITY_RATE,
    METRIC_COLUMNS, MINOR_INJURIES, MINOR_INJURY_RATE, REGION, SERIOUS_INJURIES, SUB_REGION,
};
pub(crate) use schema::{count_values, float_values, string_values};
