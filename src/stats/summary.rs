//! Dataset-wide totals shown on the home view.

use crate::data::{
    count_values, AccidentTable, DataProcessor, ProcessorError, ACCIDENTS, FATALITIES,
    SERIOUS_INJURIES,
};
use num_format::{Locale, ToFormattedString};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_accidents: i64,
    pub total_fatalities: i64,
    pub total_serious_injuries: i64,
    pub row_count: usize,
    pub region_count: usize,
}

impl Summary {
    pub fn of(table: &AccidentTable) -> Result<Self, ProcessorError> {
        let df = table.frame();
        let total = |name: &str| -> Result<i64, ProcessorError> {
            Ok(count_values(df, name)?.into_iter().sum())
        };

        Ok(Self {
            total_accidents: total(ACCIDENTS)?,
            total_fatalities: total(FATALITIES)?,
            total_serious_injuries: total(SERIOUS_INJURIES)?,
            row_count: table.row_count(),
            region_count: DataProcessor::regions(table)?.len(),
        })
    }
}

/// Thousands-separated count with a unit suffix, e.g. `12,345건`.
pub fn format_count(value: i64, unit: &str) -> String {
    format!("{}{}", value.to_formatted_string(&Locale::en), unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AccidentRecord;

    #[test]
    fn test_summary_totals() {
        let table = AccidentTable::from_records(&[
            AccidentRecord::new("A", "X", [10, 1, 2, 3, 4]),
            AccidentRecord::new("A", "Y", [5, 0, 1, 2, 1]),
            AccidentRecord::new("B", "Z", [8, 2, 1, 1, 0]),
        ])
        .unwrap();

        let summary = Summary::of(&table).unwrap();
        assert_eq!(summary.total_accidents, 23);
        assert_eq!(summary.total_fatalities, 3);
        assert_eq!(summary.total_serious_injuries, 4);
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.region_count, 2);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1234567, "건"), "1,234,567건");
        assert_eq!(format_count(0, "명"), "0명");
    }
}
