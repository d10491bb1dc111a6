//! Accident Table Schema
//! Canonical column names, source headers and typed row views.

use polars::prelude::*;

pub const REGION: &str = "region";
pub const SUB_REGION: &str = "sub_region";
pub const ACCIDENTS: &str = "accidents";
pub const FATALITIES: &str = "fatalities";
pub const SERIOUS_INJURIES: &str = "serious_injuries";
pub const MINOR_INJURIES: &str = "minor_injuries";
pub const INJURY_REPORTS: &str = "injury_reports";

pub const FATALITY_RATE: &str = "fatality_rate";
pub const MINOR_INJURY_RATE: &str = "minor_injury_rate";

/// Numeric count columns in display order.
pub const METRIC_COLUMNS: [&str; 5] = [
    ACCIDENTS,
    FATALITIES,
    SERIOUS_INJURIES,
    MINOR_INJURIES,
    INJURY_REPORTS,
];

/// (source header, canonical name) for every required column.
pub const SOURCE_COLUMNS: [(&str, &str); 7] = [
    ("시도", REGION),
    ("시군구", SUB_REGION),
    ("사고건수", ACCIDENTS),
    ("사망자수", FATALITIES),
    ("중상자수", SERIOUS_INJURIES),
    ("경상자수", MINOR_INJURIES),
    ("부상신고자수", INJURY_REPORTS),
];

/// Korean display label for a canonical column.
pub fn label(column: &str) -> &str {
    SOURCE_COLUMNS
        .iter()
        .find(|(_, canonical)| *canonical == column)
        .map(|(header, _)| *header)
        .unwrap_or(match column {
            FATALITY_RATE => "사망률",
            MINOR_INJURY_RATE => "경상률",
            other => other,
        })
}

/// One (region, sub-region) row of the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccidentRecord {
    pub region: String,
    pub sub_region: String,
    pub accidents: i64,
    pub fatalities: i64,
    pub serious_injuries: i64,
    pub minor_injuries: i64,
    pub injury_reports: i64,
}

impl AccidentRecord {
    pub fn new(
        region: &str,
        sub_region: &str,
        counts: [i64; 5],
    ) -> Self {
        let [accidents, fatalities, serious_injuries, minor_injuries, injury_reports] = counts;
        Self {
            region: region.to_string(),
            sub_region: sub_region.to_string(),
            accidents,
            fatalities,
            serious_injuries,
            minor_injuries,
            injury_reports,
        }
    }
}

/// Summed counts for one region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTotals {
    pub region: String,
    pub accidents: i64,
    pub fatalities: i64,
    pub serious_injuries: i64,
    pub minor_injuries: i64,
    pub injury_reports: i64,
}

impl RegionTotals {
    /// Counts in `METRIC_COLUMNS` order.
    pub fn metrics(&self) -> [i64; 5] {
        [
            self.accidents,
            self.fatalities,
            self.serious_injuries,
            self.minor_injuries,
            self.injury_reports,
        ]
    }
}

/// Immutable handle over the loaded accident table.
///
/// Built once at startup and passed by reference to every view. Derived
/// columns are only ever added to working copies.
#[derive(Debug, Clone)]
pub struct AccidentTable {
    df: DataFrame,
}

impl AccidentTable {
    /// Wrap a frame that already carries the canonical columns.
    pub(crate) fn from_frame(df: DataFrame) -> Self {
        Self { df }
    }

    /// Build a table from typed rows.
    pub fn from_records(records: &[AccidentRecord]) -> PolarsResult<Self> {
        let regions: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
        let sub_regions: Vec<&str> = records.iter().map(|r| r.sub_region.as_str()).collect();
        let count = |f: fn(&AccidentRecord) -> i64| -> Vec<i64> { records.iter().map(f).collect() };

        let df = DataFrame::new(vec![
            Column::new(REGION.into(), regions),
            Column::new(SUB_REGION.into(), sub_regions),
            Column::new(ACCIDENTS.into(), count(|r| r.accidents)),
            Column::new(FATALITIES.into(), count(|r| r.fatalities)),
            Column::new(SERIOUS_INJURIES.into(), count(|r| r.serious_injuries)),
            Column::new(MINOR_INJURIES.into(), count(|r| r.minor_injuries)),
            Column::new(INJURY_REPORTS.into(), count(|r| r.injury_reports)),
        ])?;

        Ok(Self { df })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Typed copy of every row.
    pub fn records(&self) -> PolarsResult<Vec<AccidentRecord>> {
        records_of(&self.df)
    }
}

/// Read string values of a column, nulls as empty strings.
pub(crate) fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let ca = df.column(name)?.str()?;
    Ok(ca
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

/// Read integer values of a count column, nulls as zero.
pub(crate) fn count_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<i64>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    let ca = column.i64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(0)).collect())
}

/// Read a float column, keeping nulls.
pub(crate) fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let ca = column.f64()?;
    Ok(ca.into_iter().collect())
}

pub(crate) fn records_of(df: &DataFrame) -> PolarsResult<Vec<AccidentRecord>> {
    let regions = string_values(df, REGION)?;
    let sub_regions = string_values(df, SUB_REGION)?;
    let accidents = count_values(df, ACCIDENTS)?;
    let fatalities = count_values(df, FATALITIES)?;
    let serious = count_values(df, SERIOUS_INJURIES)?;
    let minor = count_values(df, MINOR_INJURIES)?;
    let reports = count_values(df, INJURY_REPORTS)?;

    Ok((0..df.height())
        .map(|i| AccidentRecord {
            region: regions[i].clone(),
            sub_region: sub_regions[i].clone(),
            accidents: accidents[i],
            fatalities: fatalities[i],
            serious_injuries: serious[i],
            minor_injuries: minor[i],
            injury_reports: reports[i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_round_trip_through_frame() {
        let rows = vec![
            AccidentRecord::new("A", "X", [10, 1, 2, 3, 4]),
            AccidentRecord::new("B", "Y", [0, 0, 0, 0, 0]),
        ];
        let table = AccidentTable::from_records(&rows).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.records().unwrap(), rows);
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(ACCIDENTS), "사고건수");
        assert_eq!(label(FATALITY_RATE), "사망률");
        assert_eq!(label("unknown"), "unknown");
    }
}
