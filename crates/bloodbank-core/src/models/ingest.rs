//! Ingestion pipeline models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A spreadsheet/CSV row after field mapping and normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Parsed date; None when the raw value did not parse. Rows without a
    /// date still count toward quantity/revenue totals but are excluded
    /// from month-based aggregation.
    pub date: Option<NaiveDate>,
    /// `YYYY-MM`, derived from `date`.
    pub month: Option<String>,
    /// Title-cased, whitespace-collapsed product name.
    pub product_name: String,
    pub quantity: f64,
    pub price: f64,
    /// Supplied total column if one mapped, else `quantity * price`.
    pub total: f64,
}

impl NormalizedRow {
    /// Composite dedup key: later rows sharing it are dropped.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.date.map_or_else(String::new, |d| d.to_string()),
            self.product_name.to_lowercase(),
            self.quantity,
            self.price
        )
    }
}

/// Per-file ingestion summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub file_name: String,
    pub record_count: usize,
    pub duplicates_removed: usize,
    pub total_quantity: f64,
    pub total_revenue: f64,
    pub unique_products: usize,
    pub months_spanned: usize,
    /// Raw header -> canonical field name, for display.
    pub field_mapping: BTreeMap<String, String>,
}

/// Successful pipeline output.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub data: Vec<NormalizedRow>,
    pub summary: IngestSummary,
}

/// Structured pipeline outcome; no stage failure escapes past this.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub success: bool,
    pub data: Vec<NormalizedRow>,
    pub summary: Option<IngestSummary>,
    pub error: Option<String>,
}

impl IngestOutcome {
    pub fn ok(report: IngestReport) -> Self {
        Self {
            success: true,
            data: report.data,
            summary: Some(report.summary),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            summary: None,
            error: Some(message.into()),
        }
    }
}
