//! Data Processor Module
//! Region grouping, filtering, sorting and the wide-to-long reshape.

use super::schema::{
    count_values, records_of, string_values, AccidentRecord, AccidentTable, RegionTotals,
    ACCIDENTS, FATALITIES, INJURY_REPORTS, METRIC_COLUMNS, MINOR_INJURIES, REGION,
    SERIOUS_INJURIES,
};
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One row of the long (melted) comparison table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub region: String,
    pub metric: &'static str,
    pub value: f64,
}

/// Table operations feeding the views.
pub struct DataProcessor;

impl DataProcessor {
    /// Distinct regions in order of first appearance.
    pub fn regions(table: &AccidentTable) -> Result<Vec<String>, ProcessorError> {
        let mut seen = HashSet::new();
        Ok(string_values(table.frame(), REGION)?
            .into_iter()
            .filter(|r| seen.insert(r.clone()))
            .collect())
    }

    /// Rows whose region is one of `regions`.
    pub fn filter_regions(
        table: &AccidentTable,
        regions: &[String],
    ) -> Result<DataFrame, ProcessorError> {
        let wanted: HashSet<&str> = regions.iter().map(String::as_str).collect();
        let df = table.frame();
        let mask: BooleanChunked = df
            .column(REGION)?
            .str()?
            .into_iter()
            .map(|v| v.is_some_and(|r| wanted.contains(r)))
            .collect();
        Ok(df.filter(&mask)?)
    }

    /// Group rows by region and sum every count column.
    ///
    /// With a filter, only the listed regions take part; names not present
    /// in the table contribute nothing. Output follows first-appearance
    /// order of the regions.
    pub fn aggregate_by_region(
        table: &AccidentTable,
        filter: Option<&[String]>,
    ) -> Result<DataFrame, ProcessorError> {
        let scoped = match filter {
            Some(regions) => Self::filter_regions(table, regions)?,
            None => table.frame().clone(),
        };

        let sums: Vec<Expr> = METRIC_COLUMNS.iter().map(|c| col(*c).sum()).collect();
        let grouped = scoped
            .lazy()
            .group_by_stable([col(REGION)])
            .agg(sums)
            .collect()?;

        Ok(grouped)
    }

    /// Typed rows of an aggregate produced by `aggregate_by_region`.
    pub fn region_totals(aggregate: &DataFrame) -> Result<Vec<RegionTotals>, ProcessorError> {
        let regions = string_values(aggregate, REGION)?;
        let accidents = count_values(aggregate, ACCIDENTS)?;
        let fatalities = count_values(aggregate, FATALITIES)?;
        let serious = count_values(aggregate, SERIOUS_INJURIES)?;
        let minor = count_values(aggregate, MINOR_INJURIES)?;
        let reports = count_values(aggregate, INJURY_REPORTS)?;

        Ok(regions
            .into_iter()
            .enumerate()
            .map(|(i, region)| RegionTotals {
                region,
                accidents: accidents[i],
                fatalities: fatalities[i],
                serious_injuries: serious[i],
                minor_injuries: minor[i],
                injury_reports: reports[i],
            })
            .collect())
    }

    /// Rows of one region, most accidents first. Ties keep table order.
    pub fn sub_regions_of(
        table: &AccidentTable,
        region: &str,
    ) -> Result<Vec<AccidentRecord>, ProcessorError> {
        let filtered = Self::filter_regions(table, &[region.to_string()])?;
        let sorted = filtered.sort(
            [ACCIDENTS],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )?;
        Ok(records_of(&sorted)?)
    }

    /// Transform per-region totals to long format (stack operation).
    ///
    /// Output is region-major with metrics in `METRIC_COLUMNS` order.
    pub fn melt_metrics(totals: &[RegionTotals]) -> Vec<MetricValue> {
        totals
            .iter()
            .flat_map(|t| {
                METRIC_COLUMNS
                    .iter()
                    .zip(t.metrics())
                    .map(move |(metric, value)| MetricValue {
                        region: t.region.clone(),
                        metric: *metric,
                        value: value as f64,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AccidentTable {
        AccidentTable::from_records(&[
            AccidentRecord::new("A", "X", [10, 1, 2, 3, 4]),
            AccidentRecord::new("B", "Z", [8, 2, 1, 1, 0]),
            AccidentRecord::new("A", "Y", [5, 0, 1, 2, 1]),
            AccidentRecord::new("C", "W", [7, 1, 1, 1, 1]),
        ])
        .unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_regions_first_appearance_order() {
        assert_eq!(DataProcessor::regions(&sample()).unwrap(), strings(&["A", "B", "C"]));
    }

    #[test]
    fn test_aggregate_region_totals() {
        let agg = DataProcessor::aggregate_by_region(&sample(), None).unwrap();
        let totals = DataProcessor::region_totals(&agg).unwrap();

        assert_eq!(totals.len(), 3);
        assert_eq!(
            totals[0],
            RegionTotals {
                region: "A".into(),
                accidents: 15,
                fatalities: 1,
                serious_injuries: 3,
                minor_injuries: 5,
                injury_reports: 5,
            }
        );
        assert_eq!(totals[1].region, "B");
        assert_eq!(totals[2].region, "C");
    }

    #[test]
    fn test_aggregate_subset_preserves_sums() {
        let table = sample();
        let subset = strings(&["A", "C", "nowhere"]);
        let agg = DataProcessor::aggregate_by_region(&table, Some(subset.as_slice())).unwrap();
        let totals = DataProcessor::region_totals(&agg).unwrap();

        assert!(totals.len() <= subset.len());
        assert_eq!(totals.len(), 2);

        let aggregated: i64 = totals.iter().map(|t| t.accidents).sum();
        let raw: i64 = table
            .records()
            .unwrap()
            .iter()
            .filter(|r| subset.contains(&r.region))
            .map(|r| r.accidents)
            .sum();
        assert_eq!(aggregated, raw);
    }

    #[test]
    fn test_aggregate_unmatched_filter_is_empty() {
        let agg =
            DataProcessor::aggregate_by_region(&sample(), Some(strings(&["nowhere"]).as_slice())).unwrap();
        assert_eq!(agg.height(), 0);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let table = sample();
        let subset = strings(&["B", "A"]);
        let first = DataProcessor::aggregate_by_region(&table, Some(subset.as_slice())).unwrap();
        let second = DataProcessor::aggregate_by_region(&table, Some(subset.as_slice())).unwrap();
        assert!(first.equals(&second));
    }

    #[test]
    fn test_sub_regions_sorted_descending() {
        let rows = DataProcessor::sub_regions_of(&sample(), "A").unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.sub_region.as_str()).collect();
        assert_eq!(names, vec!["X", "Y"]);

        assert!(DataProcessor::sub_regions_of(&sample(), "nowhere")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_sub_region_ties_keep_table_order() {
        let table = AccidentTable::from_records(&[
            AccidentRecord::new("A", "P", [5, 0, 0, 0, 0]),
            AccidentRecord::new("A", "Q", [9, 0, 0, 0, 0]),
            AccidentRecord::new("A", "R", [5, 0, 0, 0, 0]),
            AccidentRecord::new("A", "S", [5, 0, 0, 0, 0]),
        ])
        .unwrap();

        let rows = DataProcessor::sub_regions_of(&table, "A").unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.sub_region.as_str()).collect();
        assert_eq!(names, vec!["Q", "P", "R", "S"]);
    }

    #[test]
    fn test_melt_metrics() {
        let table = sample();
        let agg =
            DataProcessor::aggregate_by_region(&table, Some(strings(&["A", "B"]).as_slice())).unwrap();
        let totals = DataProcessor::region_totals(&agg).unwrap();
        let long = DataProcessor::melt_metrics(&totals);

        assert_eq!(long.len(), 10);
        assert_eq!(
            long[5],
            MetricValue {
                region: "B".into(),
                metric: ACCIDENTS,
                value: 8.0
            }
        );
        let b_values: Vec<f64> = long
            .iter()
            .filter(|m| m.region == "B")
            .map(|m| m.value)
            .collect();
        assert_eq!(b_values, vec![8.0, 2.0, 1.0, 1.0, 0.0]);
    }
}
