//! Rate Calculator Module
//! Per-row fatality and minor-injury rates.

use crate::data::{count_values, ACCIDENTS, FATALITIES, FATALITY_RATE, MINOR_INJURIES, MINOR_INJURY_RATE};
use polars::prelude::*;

/// `numerator / accidents`, or `None` when there were no accidents.
pub fn rate(numerator: i64, accidents: i64) -> Option<f64> {
    if accidents == 0 {
        None
    } else {
        Some(numerator as f64 / accidents as f64)
    }
}

/// Derives per-row ratio columns.
pub struct RateCalculator;

impl RateCalculator {
    /// Return `df` with `fatality_rate` and `minor_injury_rate` appended.
    ///
    /// Rows with zero accidents get null in both columns.
    pub fn with_rates(df: &DataFrame) -> PolarsResult<DataFrame> {
        let accidents = count_values(df, ACCIDENTS)?;
        let fatalities = count_values(df, FATALITIES)?;
        let minor = count_values(df, MINOR_INJURIES)?;

        let ratio_column = |numerators: &[i64], name: &str| -> Series {
            numerators
                .iter()
                .zip(&accidents)
                .map(|(&n, &a)| rate(n, a))
                .collect::<Float64Chunked>()
                .with_name(name.into())
                .into_series()
        };

        let mut out = df.clone();
        out.with_column(ratio_column(&fatalities, FATALITY_RATE))?;
        out.with_column(ratio_column(&minor, MINOR_INJURY_RATE))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{float_values, AccidentRecord, AccidentTable};

    #[test]
    fn test_rate_exact() {
        assert_eq!(rate(1, 10), Some(0.1));
        assert_eq!(rate(3, 4), Some(0.75));
        assert_eq!(rate(0, 7), Some(0.0));
    }

    #[test]
    fn test_rate_zero_accidents_is_none() {
        assert_eq!(rate(0, 0), None);
        assert_eq!(rate(5, 0), None);
    }

    #[test]
    fn test_with_rates_appends_columns() {
        let table = AccidentTable::from_records(&[
            AccidentRecord::new("A", "X", [10, 1, 2, 3, 4]),
            AccidentRecord::new("A", "Y", [0, 0, 0, 0, 0]),
            AccidentRecord::new("B", "Z", [8, 2, 1, 4, 0]),
        ])
        .unwrap();

        let df = RateCalculator::with_rates(table.frame()).unwrap();
        assert_eq!(df.width(), table.frame().width() + 2);
        // Base table is untouched
        assert_eq!(table.frame().width(), 7);

        let fatality = float_values(&df, FATALITY_RATE).unwrap();
        let minor = float_values(&df, MINOR_INJURY_RATE).unwrap();
        assert_eq!(fatality, vec![Some(1.0 / 10.0), None, Some(2.0 / 8.0)]);
        assert_eq!(minor, vec![Some(3.0 / 10.0), None, Some(4.0 / 8.0)]);
    }
}
