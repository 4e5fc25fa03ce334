//! Clinic management-system exports: medicine usage and item sales.
//!
//! These reports come out of an external system with unstable column
//! names, so lookup goes through candidate lists instead of the regular
//! field mapping. The reporting month is carried in the file name, not
//! in the rows.

use serde::{Deserialize, Serialize};

use super::format::RawRow;

/// One usage line: external-use products only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRow {
    pub product_name: String,
    pub product_type: String,
    pub quantity: f64,
    /// `MM/YYYY`, from the file name.
    pub month_year: String,
}

/// One sales line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub product_name: String,
    pub quantity: f64,
    pub total_amount: f64,
    /// `MM/YYYY`, from the file name.
    pub month_year: String,
}

/// Usage totals grouped by product type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub product_type: String,
    pub total_quantity: f64,
}

/// Sales totals for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_name: String,
    pub total_quantity: f64,
    pub total_revenue: f64,
}

/// Per-product sales totals plus the grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub products: Vec<ProductSales>,
    pub grand_total: f64,
}

const USAGE_PRODUCT_CANDIDATES: &[&str] = &[
    "Medicine",
    "מוצר",
    "תרופה",
    "שם",
    "שם מוצר",
    "Product Name",
];
const USAGE_QUANTITY_CANDIDATES: &[&str] = &["Quantity", "כמות", "כמות (יחידות)", "Amount"];
const USAGE_TYPE_CANDIDATES: &[&str] = &["Type", "סוג", "סוג מנה", "Product Type"];

const SALES_PRODUCT_CANDIDATES: &[&str] = &["Name", "שם", "מוצר", "שם מוצר", "Product Name"];
const SALES_QUANTITY_CANDIDATES: &[&str] = &["Quantity", "כמות", "כמות שנמכרה"];
// Candidate order carries no priority: lookup walks the row's keys and
// takes the first non-empty cell matching any candidate. "Price" is
// here as a stand-in total for exports that have no total column at
// all; in a row carrying both headers, key order decides.
const SALES_TOTAL_CANDIDATES: &[&str] = &[
    "Total",
    "סה״כ",
    "סכום כללי",
    "Total incl. VAT",
    "Price",
];

/// External-use marker in product names.
const EXTERNAL_MARKER: &str = "חיצונ";

/// First non-empty value under a header matching any candidate, where
/// "matching" is a case-insensitive substring test in either direction.
pub fn find_column_value<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a str> {
    for (key, value) in row {
        if value.is_empty() {
            continue;
        }
        let key_lower = key.to_lowercase();
        let matched = candidates.iter().any(|candidate| {
            let candidate = candidate.to_lowercase();
            key_lower.contains(&candidate) || candidate.contains(&key_lower)
        });
        if matched {
            return Some(value);
        }
    }
    None
}

// Non-finite values count as unparseable; see `row::parse_number`.
fn number_or_zero(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Reporting month from a file name such as
/// `Medicine_usage_01-07-2025_-_31-07-2025.xlsx`: the first
/// `DD-MM-YYYY` fragment, rendered as `MM/YYYY`.
pub fn month_from_filename(filename: &str) -> Option<String> {
    let bytes = filename.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);
    let is_dash = |i: usize| bytes.get(i) == Some(&b'-');

    for start in 0..bytes.len() {
        let shape = is_digit(start)
            && is_digit(start + 1)
            && is_dash(start + 2)
            && is_digit(start + 3)
            && is_digit(start + 4)
            && is_dash(start + 5)
            && (start + 9 < bytes.len())
            && (start + 6..start + 10).all(is_digit);
        if shape {
            let month = &filename[start + 3..start + 5];
            let year = &filename[start + 6..start + 10];
            return Some(format!("{month}/{year}"));
        }
    }
    None
}

/// Extract usage rows: external-use products with a positive quantity.
pub fn parse_usage_rows(rows: &[RawRow], month_year: &str) -> Vec<UsageRow> {
    rows.iter()
        .filter_map(|row| {
            let product_name = find_column_value(row, USAGE_PRODUCT_CANDIDATES)?;
            let quantity = number_or_zero(find_column_value(row, USAGE_QUANTITY_CANDIDATES));
            if !product_name.contains(EXTERNAL_MARKER) || quantity <= 0.0 {
                return None;
            }
            Some(UsageRow {
                product_name: product_name.to_string(),
                product_type: find_column_value(row, USAGE_TYPE_CANDIDATES)
                    .unwrap_or_default()
                    .to_string(),
                quantity,
                month_year: month_year.to_string(),
            })
        })
        .collect()
}

/// Extract sales rows: any product with a positive quantity.
pub fn parse_sales_rows(rows: &[RawRow], month_year: &str) -> Vec<SalesRow> {
    rows.iter()
        .filter_map(|row| {
            let product_name = find_column_value(row, SALES_PRODUCT_CANDIDATES)?;
            let quantity = number_or_zero(find_column_value(row, SALES_QUANTITY_CANDIDATES));
            if quantity <= 0.0 {
                return None;
            }
            Some(SalesRow {
                product_name: product_name.to_string(),
                quantity,
                total_amount: number_or_zero(find_column_value(row, SALES_TOTAL_CANDIDATES)),
                month_year: month_year.to_string(),
            })
        })
        .collect()
}

/// Group usage by product type (falling back to the product name),
/// first-seen order.
pub fn usage_summary(rows: &[UsageRow]) -> Vec<UsageSummary> {
    let mut groups: Vec<UsageSummary> = Vec::new();
    for row in rows {
        let key = if row.product_type.is_empty() {
            &row.product_name
        } else {
            &row.product_type
        };
        match groups.iter_mut().find(|g| &g.product_type == key) {
            Some(group) => group.total_quantity += row.quantity,
            None => groups.push(UsageSummary {
                product_type: key.clone(),
                total_quantity: row.quantity,
            }),
        }
    }
    groups
}

/// Group sales by product, first-seen order, with the grand total.
pub fn sales_summary(rows: &[SalesRow]) -> SalesSummary {
    let mut products: Vec<ProductSales> = Vec::new();
    for row in rows {
        match products
            .iter_mut()
            .find(|p| p.product_name == row.product_name)
        {
            Some(product) => {
                product.total_quantity += row.quantity;
                product.total_revenue += row.total_amount;
            }
            None => products.push(ProductSales {
                product_name: row.product_name.clone(),
                total_quantity: row.quantity,
                total_revenue: row.total_amount,
            }),
        }
    }
    let grand_total = products.iter().map(|p| p.total_revenue).sum();
    SalesSummary {
        products,
        grand_total,
    }
}
