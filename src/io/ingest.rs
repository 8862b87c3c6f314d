//! CSV ingest.
//!
//! This module turns a `time,flux` CSV (file or stdin) into the raw numeric
//! pair the detection core consumes.
//!
//! Design goals:
//! - **Strict schema**: a header naming `time` and `flux` (any order, any case)
//! - **Row-level validation**: unparseable rows are skipped and reported
//! - **No cleaning here**: non-finite values pass through to the preprocessor

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::DetectError;

pub const NO_DATA_MESSAGE: &str = "No CSV data provided";
pub const MISSING_COLUMNS_MESSAGE: &str = "CSV must contain \"time\" and \"flux\" columns";
pub const TOO_FEW_ROWS_MESSAGE: &str = "Insufficient data points. Need at least 100 measurements.";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Raw measurements in file order, plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedCurve {
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedCurve {
    pub fn rows_used(&self) -> usize {
        self.time.len()
    }
}

/// Read a light curve from `path`, or from stdin when `path` is `None`.
pub fn load_light_curve(path: Option<&Path>, min_rows: usize) -> Result<IngestedCurve, DetectError> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| DetectError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
            parse_light_curve(file, min_rows)
        }
        None => parse_light_curve(std::io::stdin().lock(), min_rows),
    }
}

/// Parse CSV text with `time` and `flux` columns.
///
/// Fails when the input is blank, when either column is missing, or when
/// fewer than `min_rows` rows parse.
pub fn parse_light_curve<R: Read>(mut reader: R, min_rows: usize) -> Result<IngestedCurve, DetectError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| DetectError::input(format!("Failed to read CSV input: {e}")))?;
    if text.trim().is_empty() {
        return Err(DetectError::input(NO_DATA_MESSAGE));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DetectError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let (Some(&time_idx), Some(&flux_idx)) = (header_map.get("time"), header_map.get("flux")) else {
        return Err(DetectError::input(MISSING_COLUMNS_MESSAGE));
    };

    let mut time = Vec::new();
    let mut flux = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, time_idx, flux_idx) {
            Ok((t, f)) => {
                time.push(t);
                flux.push(f);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if time.len() < min_rows {
        return Err(DetectError::input(TOO_FEW_ROWS_MESSAGE));
    }

    Ok(IngestedCurve {
        time,
        flux,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated column names.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, time_idx: usize, flux_idx: usize) -> Result<(f64, f64), String> {
    let t = parse_field(record, time_idx, "time")?;
    let f = parse_field(record, flux_idx, "flux")?;
    Ok((t, f))
}

fn parse_field(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing `{name}` value"))?;
    raw.parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_with_rows(header: &str, n: usize) -> String {
        let mut s = format!("{header}\n");
        for i in 0..n {
            s.push_str(&format!("{},{}\n", i as f64 * 0.1, 1.0 + (i % 3) as f64 * 1e-4));
        }
        s
    }

    #[test]
    fn parses_time_and_flux() {
        let data = csv_with_rows("time,flux", 120);
        let curve = parse_light_curve(data.as_bytes(), 100).unwrap();
        assert_eq!(curve.rows_used(), 120);
        assert_eq!(curve.rows_read, 120);
        assert!((curve.time[1] - 0.1).abs() < 1e-12);
        assert!(curve.row_errors.is_empty());
    }

    #[test]
    fn finds_columns_in_any_order_and_case() {
        let mut data = String::from("\u{feff}Flux, quality ,TIME\n");
        for i in 0..5 {
            data.push_str(&format!("0.99{i},0,{i}\n"));
        }
        let curve = parse_light_curve(data.as_bytes(), 1).unwrap();
        assert_eq!(curve.time, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!((curve.flux[2] - 0.992).abs() < 1e-12);
    }

    #[test]
    fn bad_rows_are_skipped_with_line_numbers() {
        let data = "time,flux\n0,1.0\nabc,1.0\n2,\n3,nan\n";
        let curve = parse_light_curve(data.as_bytes(), 1).unwrap();
        assert_eq!(curve.rows_read, 4);
        assert_eq!(curve.rows_used(), 2);
        assert!(curve.flux[1].is_nan());
        let lines: Vec<usize> = curve.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn blank_input_is_no_data() {
        let err = parse_light_curve("  \n ".as_bytes(), 100).unwrap_err();
        assert_eq!(err.to_string(), NO_DATA_MESSAGE);
    }

    #[test]
    fn missing_columns_are_rejected() {
        let data = csv_with_rows("t,brightness", 150);
        let err = parse_light_curve(data.as_bytes(), 100).unwrap_err();
        assert_eq!(err.to_string(), MISSING_COLUMNS_MESSAGE);
    }

    #[test]
    fn fewer_than_min_rows_is_rejected() {
        let data = csv_with_rows("time,flux", 99);
        let err = parse_light_curve(data.as_bytes(), 100).unwrap_err();
        assert!(err.is_input());
        assert_eq!(err.to_string(), TOO_FEW_ROWS_MESSAGE);
    }
}
