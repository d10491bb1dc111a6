//! CSV Data Loader Module
//! Reads the accident statistics file, decodes its legacy encoding and
//! normalizes the columns using Polars.

use super::schema::{AccidentTable, METRIC_COLUMNS, REGION, SOURCE_COLUMNS, SUB_REGION};
use encoding_rs::Encoding;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Loads the accident table once at startup.
pub struct DataLoader;

impl DataLoader {
    /// Read and normalize the CSV file at `path`.
    pub fn load(path: &Path, encoding_label: &str) -> Result<AccidentTable, LoaderError> {
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::parse(&bytes, encoding_label)?;
        info!(
            path = %path.display(),
            rows = table.row_count(),
            "Loaded accident statistics"
        );
        Ok(table)
    }

    /// Decode raw bytes in the given encoding and parse them as CSV.
    pub fn parse(bytes: &[u8], encoding_label: &str) -> Result<AccidentTable, LoaderError> {
        let text = Self::decode(bytes, encoding_label)?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()?;

        Self::normalize(df).map(AccidentTable::from_frame)
    }

    /// Decode bytes to UTF-8. A byte-order mark overrides the label.
    pub fn decode(bytes: &[u8], encoding_label: &str) -> Result<String, LoaderError> {
        let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
            .ok_or_else(|| LoaderError::UnknownEncoding(encoding_label.to_string()))?;

        let (text, used, had_errors) = encoding.decode(bytes);
        if had_errors {
            warn!(
                encoding = used.name(),
                "Input contained malformed sequences; replaced with U+FFFD"
            );
        }
        Ok(text.into_owned())
    }

    /// Keep only the required columns under their canonical names, with
    /// counts as Int64 and blank region names as empty strings.
    fn normalize(df: DataFrame) -> Result<DataFrame, LoaderError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        let mut columns = Vec::with_capacity(SOURCE_COLUMNS.len());
        for (header, canonical) in SOURCE_COLUMNS {
            let idx = names
                .iter()
                .position(|n| n == header)
                .ok_or_else(|| LoaderError::MissingColumn(header.to_string()))?;

            let column = df.get_columns()[idx].clone();
            let column = if METRIC_COLUMNS.contains(&canonical) {
                column.strict_cast(&DataType::Int64)?
            } else {
                column.cast(&DataType::String)?
            };
            columns.push(column.with_name(canonical.into()));
        }

        let df = DataFrame::new(columns)?
            .lazy()
            .with_columns([
                col(REGION).fill_null(lit("")),
                col(SUB_REGION).fill_null(lit("")),
            ])
            .collect()?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::AccidentRecord;
    use crate::data::DataProcessor;

    const SAMPLE: &str = "시도,시군구,사고건수,사망자수,중상자수,경상자수,부상신고자수,비고\n\
서울,종로구,1000,5,200,900,80,x\n\
서울,중구,800,3,150,700,60,y\n\
경기,수원시,2000,20,500,1800,100,z\n";

    fn euc_kr(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_parse_cp949_input() {
        let table = DataLoader::parse(&euc_kr(SAMPLE), "windows-949").unwrap();
        let records = table.records().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            AccidentRecord::new("서울", "종로구", [1000, 5, 200, 900, 80])
        );
        assert_eq!(records[2].region, "경기");
        // Extra source columns are dropped
        assert_eq!(table.frame().width(), 7);
    }

    #[test]
    fn test_parse_utf8_input() {
        let table = DataLoader::parse(SAMPLE.as_bytes(), "utf-8").unwrap();
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "시도,시군구,사고건수\n서울,종로구,10\n";
        let err = DataLoader::parse(csv.as_bytes(), "utf-8").unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "사망자수"));
    }

    #[test]
    fn test_unknown_encoding() {
        let err = DataLoader::parse(b"", "no-such-encoding").unwrap_err();
        assert!(matches!(err, LoaderError::UnknownEncoding(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::load(Path::new("does/not/exist.csv"), "utf-8").unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_non_numeric_count_is_fatal() {
        let csv = "시도,시군구,사고건수,사망자수,중상자수,경상자수,부상신고자수\n\
서울,종로구,1000,5,200,900,80\n\
서울,중구,many,3,150,700,60\n";
        let err = DataLoader::parse(csv.as_bytes(), "utf-8").unwrap_err();
        assert!(matches!(err, LoaderError::CsvError(_)));
    }

    #[test]
    fn test_bom_overrides_label() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(SAMPLE.as_bytes());

        let text = DataLoader::decode(&bytes, "windows-949").unwrap();
        assert!(text.starts_with("시도,시군구"));

        let table = DataLoader::parse(&bytes, "windows-949").unwrap();
        assert_eq!(table.records().unwrap()[0].region, "서울");
    }

    #[test]
    fn test_blank_region_is_empty_string() {
        let csv = "시도,시군구,사고건수,사망자수,중상자수,경상자수,부상신고자수\n\
서울,종로구,1000,5,200,900,80\n\
,미상,7,0,1,5,1\n";
        let table = DataLoader::parse(csv.as_bytes(), "utf-8").unwrap();
        assert_eq!(table.frame().column(REGION).unwrap().null_count(), 0);

        let regions = DataProcessor::regions(&table).unwrap();
        assert_eq!(regions, vec!["서울".to_string(), String::new()]);

        let rows = DataProcessor::sub_regions_of(&table, "").unwrap();
        assert_eq!(rows, vec![AccidentRecord::new("", "미상", [7, 0, 1, 5, 1])]);
    }
}
