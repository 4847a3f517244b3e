//! CSV ingest and validation.
//!
//! This module turns an untrusted CSV into a validated dataset of [`Record`]s.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **All-or-nothing validation**: a dataset is wholly accepted or wholly
//!   rejected, never row-filtered
//! - **Deterministic behavior** (fixed column scan order, no hidden state)
//! - **Separation of concerns**: file/delimiter mechanics live in the reader;
//!   [`validate_table`] only ever sees an in-memory table

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{NUMERIC_COLUMNS, REQUIRED_COLUMNS, Record};
use crate::error::{AppError, DataError};

/// An untyped table as handed over by the CSV reader: named columns over
/// string cells. This is the validator's input contract; anything that can
/// produce one of these (upload handler, test fixture) can feed the pipeline.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read a CSV file into a [`RawTable`].
///
/// No validation happens here beyond CSV well-formedness; column names and
/// cell contents are taken as-is (the first header is BOM-stripped, since
/// Excel-style exports often prefix one and schema checks would otherwise
/// report a phantom missing column).
pub fn read_raw_table(path: &Path) -> Result<RawTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_raw_table_from(file)
}

/// Read CSV from any reader into a [`RawTable`].
pub fn read_raw_table_from(input: impl std::io::Read) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::new(2, format!("CSV parse error: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

fn normalize_header_name(name: &str) -> String {
    // Column names are matched case-sensitively, so only strip whitespace and
    // a possible UTF-8 BOM on the first header.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Validate a raw table against the record contract and build the dataset.
///
/// Checks, in order:
/// 1. every required column is present (all missing columns reported at once,
///    in canonical column order)
/// 2. the `date` column bulk-parses to calendar dates (any bad cell rejects
///    the whole table)
/// 3. each numeric column is entirely numeric; the scan stops at the first
///    offending column (deliberately asymmetric with the exhaustive schema
///    check, preserved from the system this replaces)
///
/// No semantic checks beyond that: out-of-range percentages and inconsistent
/// pre-computed `page_rpm`/`ecpm` columns are accepted and flow through to the
/// aggregates unchanged. The input is never mutated.
pub fn validate_table(table: &RawTable) -> Result<Vec<Record>, DataError> {
    let index: HashMap<&str, usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !index.contains_key(col))
        .collect();
    if !missing.is_empty() {
        return Err(DataError::Schema { missing });
    }

    // Bulk date parse. Line numbers are 1-based and account for the header.
    let date_idx = index["date"];
    let mut dates = Vec::with_capacity(table.rows.len());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let raw = cell(row, date_idx);
        let date = parse_date(raw).ok_or_else(|| DataError::DateFormat {
            line: row_idx + 2,
            value: raw.to_string(),
        })?;
        dates.push(date);
    }

    // Numeric-type scan, first offending column wins.
    for col in NUMERIC_COLUMNS {
        let idx = index[col];
        let column_ok = table.rows.iter().all(|row| {
            let raw = cell(row, idx);
            if col == "impressions" {
                parse_count(raw).is_some()
            } else {
                parse_f64(raw).is_some()
            }
        });
        if !column_ok {
            return Err(DataError::NonNumeric { column: col });
        }
    }

    let source_idx = index["source"];
    let revenue_idx = index["revenue"];
    let impressions_idx = index["impressions"];
    let page_rpm_idx = index["page_rpm"];
    let fill_rate_idx = index["fill_rate"];
    let ecpm_idx = index["ecpm"];
    let ctr_idx = index["ctr"];

    let mut records = Vec::with_capacity(table.rows.len());
    for (row, date) in table.rows.iter().zip(dates) {
        records.push(Record {
            date,
            source: cell(row, source_idx).to_string(),
            // Parses are infallible here: the column scans above already
            // proved every cell.
            revenue: parse_f64(cell(row, revenue_idx)).unwrap_or_default(),
            impressions: parse_count(cell(row, impressions_idx)).unwrap_or_default(),
            page_rpm: parse_f64(cell(row, page_rpm_idx)).unwrap_or_default(),
            fill_rate: parse_f64(cell(row, fill_rate_idx)).unwrap_or_default(),
            ecpm: parse_f64(cell(row, ecpm_idx)).unwrap_or_default(),
            ctr: parse_f64(cell(row, ctr_idx)).unwrap_or_default(),
        });
    }

    Ok(records)
}

/// Read and validate in one step (the common CLI path).
pub fn load_dataset(path: &Path) -> Result<Vec<Record>, AppError> {
    let table = read_raw_table(path)?;
    let records = validate_table(&table)?;
    Ok(records)
}

fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(String::as_str).unwrap_or("").trim()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // ISO dates are the documented format, but spreadsheet exports often use
    // slashed or day-first variants. Accept a small fixed set to reduce
    // friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

fn parse_count(s: &str) -> Option<i64> {
    // Impressions are a count; a fractional value fails the column's numeric
    // check rather than being silently floored.
    s.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn valid_table() -> RawTable {
        table(
            &REQUIRED_COLUMNS,
            &[
                &["2024-01-01", "Google_AdEx", "100.5", "1000", "100.5", "85.0", "100.5", "1.2"],
                &["2024-01-02", "Prebid_Criteo", "50.25", "2000", "25.13", "90.0", "25.13", "0.8"],
            ],
        )
    }

    #[test]
    fn accepts_valid_table() {
        let records = validate_table(&valid_table()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "Google_AdEx");
        assert_eq!(records[0].impressions, 1000);
        assert_eq!(records[1].date, "2024-01-02".parse().unwrap());
    }

    #[test]
    fn reports_all_missing_columns_in_canonical_order() {
        // `ecpm` comes before `ctr` canonically even though both are missing;
        // `date` leads regardless of header order.
        let t = table(
            &["source", "revenue", "impressions", "page_rpm", "fill_rate"],
            &[],
        );
        let err = validate_table(&t).unwrap_err();
        assert_eq!(
            err,
            DataError::Schema {
                missing: vec!["date", "ecpm", "ctr"],
            }
        );
        assert!(err.to_string().contains("date, ecpm, ctr"));
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let t = table(
            &["Date", "source", "revenue", "impressions", "page_rpm", "fill_rate", "ecpm", "ctr"],
            &[],
        );
        let err = validate_table(&t).unwrap_err();
        assert_eq!(
            err,
            DataError::Schema {
                missing: vec!["date"],
            }
        );
    }

    #[test]
    fn rejects_whole_table_on_one_bad_date() {
        let mut t = valid_table();
        t.rows[1][0] = "not-a-date".to_string();
        let err = validate_table(&t).unwrap_err();
        assert_eq!(
            err,
            DataError::DateFormat {
                line: 3,
                value: "not-a-date".to_string(),
            }
        );
    }

    #[test]
    fn reports_first_non_numeric_column_only() {
        // Both `revenue` and `ctr` are broken; the scan order puts `revenue`
        // first, and only it is reported.
        let mut t = valid_table();
        t.rows[0][2] = "n/a".to_string();
        t.rows[1][7] = "n/a".to_string();
        let err = validate_table(&t).unwrap_err();
        assert_eq!(err, DataError::NonNumeric { column: "revenue" });
    }

    #[test]
    fn fractional_impressions_fail_the_numeric_check() {
        let mut t = valid_table();
        t.rows[0][3] = "1000.5".to_string();
        let err = validate_table(&t).unwrap_err();
        assert_eq!(err, DataError::NonNumeric { column: "impressions" });
    }

    #[test]
    fn validation_is_column_order_independent() {
        let t = table(
            &["ctr", "ecpm", "fill_rate", "page_rpm", "impressions", "revenue", "source", "date"],
            &[&["1.2", "100.5", "85.0", "100.5", "1000", "100.5", "Google_AdEx", "2024-01-01"]],
        );
        let records = validate_table(&t).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revenue, 100.5);
        assert_eq!(records[0].ctr, 1.2);
    }

    #[test]
    fn validation_is_row_order_independent() {
        let mut t = valid_table();
        t.rows.reverse();
        let records = validate_table(&t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "Prebid_Criteo");
    }

    #[test]
    fn bom_on_first_header_is_stripped() {
        assert_eq!(normalize_header_name("\u{feff}date"), "date");
        assert_eq!(normalize_header_name(" source "), "source");
    }

    #[test]
    fn accepts_alternate_date_formats() {
        for s in ["2024-01-31", "31/01/2024", "31-01-2024", "2024/01/31"] {
            assert_eq!(parse_date(s), "2024-01-31".parse().ok(), "format: {s}");
        }
        assert!(parse_date("01-31-2024").is_none());
    }
}
