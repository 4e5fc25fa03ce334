//! File format detection and raw row extraction.
//!
//! Every format is flattened to the same shape: a list of rows keyed by
//! header text, all values as strings. Field mapping and numeric
//! coercion happen downstream.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use super::pipeline::IngestError;

/// A raw parsed row: header text to cell text.
pub type RawRow = BTreeMap<String, String>;

/// Supported upload formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "json" => Ok(Self::Json),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Header keywords used to locate the real header row inside spreadsheet
/// exports that start with title or summary rows. Synonyms are grouped
/// per column concept so a file only needs one spelling per concept:
/// sales exports headered `Name/Quantity/Total incl. VAT` and usage
/// exports headered `Medicine/Quantity/Type` must detect just as well
/// as a plain `Date/Product/Quantity/Price` sheet.
const HEADER_KEYWORD_GROUPS: &[&[&str]] = &[
    &["date", "תאריך"],
    &["product", "מוצר", "name", "שם", "medicine", "תרופה", "item"],
    &["quantity", "כמות", "qty", "amount"],
    &["price", "מחיר", "total", "סה״כ"],
];

const HEADER_SCAN_ROWS: usize = 15;

/// Parse a file into raw rows according to its extension.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let rows = match FileFormat::from_path(path)? {
        FileFormat::Csv => read_csv(path)?,
        FileFormat::Xlsx | FileFormat::Xls => read_spreadsheet(path)?,
        FileFormat::Json => read_json(path)?,
    };
    debug!(path = %path.display(), rows = rows.len(), "raw rows parsed");
    Ok(rows)
}

fn read_csv(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.trim().to_string()))
            .collect();
        if row.values().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn read_spreadsheet(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::NoData)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let grid: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    let header_index = find_header_row(&grid);
    let Some(headers) = grid.get(header_index) else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for cells in grid.iter().skip(header_index + 1) {
        let row: RawRow = headers
            .iter()
            .zip(cells.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.trim().to_string()))
            .collect();
        if row.values().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Scan the first rows for the one carrying column headers: the first
/// row where at least half the header keyword groups have some spelling
/// appearing as a case-insensitive substring of a cell. Falls back to
/// row 0.
fn find_header_row(grid: &[Vec<String>]) -> usize {
    let needed = HEADER_KEYWORD_GROUPS.len().div_ceil(2);
    for (index, row) in grid.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let cells: Vec<String> = row.iter().map(|c| c.to_lowercase()).collect();
        let matched = HEADER_KEYWORD_GROUPS
            .iter()
            .filter(|group| {
                group
                    .iter()
                    .any(|keyword| cells.iter().any(|cell| cell.contains(keyword)))
            })
            .count();
        if matched >= needed {
            return index;
        }
    }
    0
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

fn read_json(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let payload = fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&payload)?;
    let serde_json::Value::Array(entries) = parsed else {
        return Err(IngestError::NotAnArray);
    };

    let mut rows = Vec::new();
    for entry in entries {
        let serde_json::Value::Object(fields) = entry else {
            continue;
        };
        let row: RawRow = fields
            .into_iter()
            .map(|(key, value)| (key, json_value_to_string(&value)))
            .collect();
        if row.values().any(|v| !v.is_empty()) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(v) => v.trim().to_string(),
        serde_json::Value::Number(v) => v.to_string(),
        serde_json::Value::Bool(v) => v.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            FileFormat::from_path(Path::new("data.CSV")).unwrap(),
            FileFormat::Csv
        );
        assert_eq!(
            FileFormat::from_path(Path::new("data.xlsx")).unwrap(),
            FileFormat::Xlsx
        );
        assert!(matches!(
            FileFormat::from_path(Path::new("data.pdf")),
            Err(IngestError::UnsupportedFormat(_))
        ));
        assert!(FileFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_find_header_row_skips_title_rows() {
        let grid = vec![
            row(&["Monthly report", "", ""]),
            row(&["", "", ""]),
            row(&["Date", "Product", "Quantity", "Price"]),
            row(&["2024-01-01", "Blood bag", "2", "100"]),
        ];
        assert_eq!(find_header_row(&grid), 2);
    }

    #[test]
    fn test_find_header_row_defaults_to_first() {
        let grid = vec![row(&["A", "B"]), row(&["1", "2"])];
        assert_eq!(find_header_row(&grid), 0);
    }

    #[test]
    fn test_find_header_row_in_usage_export() {
        // Medicine-usage exports carry no date/product/price headers.
        let grid = vec![
            row(&["Medicine usage", "", ""]),
            row(&["01-07-2025 - 31-07-2025", "", ""]),
            row(&["Medicine", "Quantity", "Type"]),
            row(&["חיצוני - משחה", "3", "משחה"]),
        ];
        assert_eq!(find_header_row(&grid), 2);
    }

    #[test]
    fn test_find_header_row_in_sales_export() {
        let grid = vec![
            row(&["Item sales", "", "", ""]),
            row(&["Name", "Quantity", "Total incl. VAT", "Price"]),
            row(&["Blood Bag", "2", "234", "100"]),
        ];
        assert_eq!(find_header_row(&grid), 1);
    }

    #[test]
    fn test_read_csv_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,product,quantity,price").unwrap();
        writeln!(file, "2024-01-01,Blood Bag,2,100").unwrap();
        writeln!(file, ",,,").unwrap();
        writeln!(file, "2024-01-02,Tube,5,10").unwrap();
        drop(file);

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["product"], "Blood Bag");
    }

    #[test]
    fn test_read_json_array_of_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.json");
        std::fs::write(
            &path,
            r#"[{"date":"2024-01-01","product":"Blood Bag","quantity":2,"price":100.5}]"#,
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["quantity"], "2");
        assert_eq!(rows[0]["price"], "100.5");
    }

    #[test]
    fn test_read_json_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.json");
        std::fs::write(&path, r#"{"date":"2024-01-01"}"#).unwrap();
        assert!(matches!(read_rows(&path), Err(IngestError::NotAnArray)));
    }
}
