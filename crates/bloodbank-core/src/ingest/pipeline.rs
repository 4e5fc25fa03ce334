//! The upload pipeline: parse, map, validate, normalize, dedupe,
//! summarize.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use super::format::read_rows;
use super::mapping::{map_field_names, missing_required_fields};
use super::row::{dedupe_rows, normalize_row};
use crate::models::{IngestOutcome, IngestReport, IngestSummary};

/// Pipeline errors.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet parsing error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("JSON file must contain an array of objects")]
    NotAnArray,

    #[error("No data found")]
    NoData,

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Run the full pipeline on one file.
pub fn try_ingest(path: &Path) -> IngestResult<IngestReport> {
    let raw = read_rows(path)?;
    if raw.is_empty() {
        return Err(IngestError::NoData);
    }

    let mapped = map_field_names(raw);
    let missing = missing_required_fields(&mapped.rows);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let normalized: Vec<_> = mapped.rows.iter().map(normalize_row).collect();
    let (data, duplicates_removed) = dedupe_rows(normalized);

    let unique_products: HashSet<&str> = data.iter().map(|r| r.product_name.as_str()).collect();
    let months_spanned: HashSet<&str> = data
        .iter()
        .filter_map(|r| r.month.as_deref())
        .collect();

    let summary = IngestSummary {
        file_name: file_name_of(path),
        record_count: data.len(),
        duplicates_removed,
        total_quantity: data.iter().map(|r| r.quantity).sum(),
        total_revenue: data.iter().map(|r| r.total).sum(),
        unique_products: unique_products.len(),
        months_spanned: months_spanned.len(),
        field_mapping: mapped.field_map,
    };

    info!(
        file = %summary.file_name,
        records = summary.record_count,
        duplicates = summary.duplicates_removed,
        "upload ingested"
    );
    Ok(IngestReport { data, summary })
}

/// Run the pipeline, folding any failure into a structured outcome.
pub fn ingest(path: &Path) -> IngestOutcome {
    match try_ingest(path) {
        Ok(report) => IngestOutcome::ok(report),
        Err(err) => {
            warn!(path = %path.display(), %err, "upload rejected");
            IngestOutcome::failure(err.to_string())
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
