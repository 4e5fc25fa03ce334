//! Row normalization and deduplication.

use chrono::NaiveDate;

use super::format::RawRow;
use crate::models::{parse_flexible_date, NormalizedRow};

/// Canonical product spelling: trimmed, single-spaced, Title Case.
pub fn normalize_product_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lenient numeric coercion: anything unparseable is zero. Literal
/// "NaN"/"inf" cells parse as f64 but would poison every downstream
/// sum, so only finite values are accepted.
fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn field<'a>(row: &'a RawRow, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

/// Month bucket ("YYYY-MM") for a parsed date.
pub fn month_of(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m").to_string())
}

/// Normalize one mapped row. An unparseable date leaves `date` and
/// `month` unset but keeps the row; its quantity and revenue still
/// count toward the totals. A missing total falls back to
/// quantity times price.
pub fn normalize_row(row: &RawRow) -> NormalizedRow {
    let date = parse_flexible_date(field(row, "date"));
    let quantity = parse_number(field(row, "quantity"));
    let price = parse_number(field(row, "price"));
    let supplied_total = field(row, "total");
    let total = if supplied_total.is_empty() {
        quantity * price
    } else {
        parse_number(supplied_total)
    };

    NormalizedRow {
        date,
        month: month_of(date),
        product_name: normalize_product_name(field(row, "productName")),
        quantity,
        price,
        total,
    }
}

/// Drop rows with a duplicate (date, product, quantity, price) key,
/// keeping the first occurrence. Returns the survivors and the number
/// of duplicates removed.
pub fn dedupe_rows(rows: Vec<NormalizedRow>) -> (Vec<NormalizedRow>, usize) {
    let before = rows.len();
    let mut seen = std::collections::HashSet::new();
    let deduped: Vec<NormalizedRow> = rows
        .into_iter()
        .filter(|row| seen.insert(row.dedup_key()))
        .collect();
    let removed = before - deduped.len();
    (deduped, removed)
}
