//! Header-to-field mapping.
//!
//! Uploads arrive with header text in English or Hebrew and plenty of
//! variation. Each canonical field carries a synonym list; exact
//! matches win over substring matches, and price/total carry guards so
//! "Total Price" never lands in the unit-price column.

use std::collections::BTreeMap;

use super::format::RawRow;

/// The canonical columns of a normalized upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Date,
    Month,
    ProductName,
    Quantity,
    Price,
    Total,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        Self::Date,
        Self::Month,
        Self::ProductName,
        Self::Quantity,
        Self::Price,
        Self::Total,
    ];

    pub const REQUIRED: [CanonicalField; 4] =
        [Self::Date, Self::ProductName, Self::Quantity, Self::Price];

    pub fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Month => "month",
            Self::ProductName => "productName",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::Total => "total",
        }
    }

    /// Known header spellings, lowercase.
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::Date => &["date", "תאריך", "datum", "fecha", "data"],
            Self::Month => &["month", "חודש", "mes", "mois"],
            Self::ProductName => &["productname", "product", "מוצר", "שם מוצר", "item", "name"],
            Self::Quantity => &["quantity", "כמות", "qty", "amount", "count"],
            Self::Price => &["price", "מחיר", "cost", "unitprice", "priceperunit"],
            Self::Total => &["total", "סה״כ", "totalprice", "totalcost", "sum"],
        }
    }

    fn matches_exact(self, header: &str) -> bool {
        self.synonyms().contains(&header)
    }

    fn matches_substring(self, header: &str) -> bool {
        // A header mentioning "total" is a total, never a unit price,
        // and a bare "price" is a unit price, never a total.
        if self == Self::Price && header.contains("total") {
            return false;
        }
        if self == Self::Total && header == "price" {
            return false;
        }
        self.synonyms()
            .iter()
            .any(|synonym| header.contains(synonym))
    }
}

/// Result of mapping raw headers onto canonical field names.
pub struct MappedData {
    /// Rows with mapped keys renamed to canonical names. Unrecognized
    /// keys pass through untouched.
    pub rows: Vec<RawRow>,
    /// Raw header -> canonical field name, for the upload summary.
    pub field_map: BTreeMap<String, String>,
}

/// Map raw headers to canonical field names using the first row as the
/// sample. Each raw header is consumed by at most one canonical field.
pub fn map_field_names(rows: Vec<RawRow>) -> MappedData {
    let Some(sample) = rows.first() else {
        return MappedData {
            rows,
            field_map: BTreeMap::new(),
        };
    };
    let headers: Vec<String> = sample.keys().cloned().collect();

    let mut field_map: BTreeMap<String, String> = BTreeMap::new();
    let mut used: Vec<&String> = Vec::new();
    for field in CanonicalField::ALL {
        let exact = headers
            .iter()
            .find(|h| !used.contains(h) && field.matches_exact(&h.to_lowercase()));
        let matched = exact.or_else(|| {
            headers
                .iter()
                .find(|h| !used.contains(h) && field.matches_substring(&h.to_lowercase()))
        });
        if let Some(header) = matched {
            used.push(header);
            field_map.insert(header.clone(), field.name().to_string());
        }
    }

    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(key, value)| {
                    let key = field_map.get(&key).cloned().unwrap_or(key);
                    (key, value)
                })
                .collect()
        })
        .collect();

    MappedData { rows, field_map }
}

/// Names of required canonical fields missing from the mapped rows.
/// Empty result means the schema is usable.
pub fn missing_required_fields(rows: &[RawRow]) -> Vec<String> {
    let Some(sample) = rows.first() else {
        return CanonicalField::REQUIRED
            .iter()
            .map(|f| f.name().to_string())
            .collect();
    };
    CanonicalField::REQUIRED
        .iter()
        .filter(|field| !sample.contains_key(field.name()))
        .map(|field| field.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_exact_match_beats_substring() {
        let rows = vec![raw_row(&[
            ("Date", "2024-01-01"),
            ("Product Name", "Blood Bag"),
            ("Quantity", "2"),
            ("Price", "100"),
        ])];
        let mapped = map_field_names(rows);
        assert_eq!(mapped.field_map["Date"], "date");
        assert_eq!(mapped.field_map["Product Name"], "productName");
        assert_eq!(mapped.field_map["Quantity"], "quantity");
        assert_eq!(mapped.field_map["Price"], "price");
    }

    #[test]
    fn test_hebrew_headers_map() {
        let rows = vec![raw_row(&[
            ("תאריך", "01/01/2024"),
            ("מוצר", "שקית דם"),
            ("כמות", "2"),
            ("מחיר", "100"),
        ])];
        let mapped = map_field_names(rows);
        assert_eq!(mapped.field_map["תאריך"], "date");
        assert_eq!(mapped.field_map["מוצר"], "productName");
        assert_eq!(mapped.field_map["כמות"], "quantity");
        assert_eq!(mapped.field_map["מחיר"], "price");
        assert!(missing_required_fields(&mapped.rows).is_empty());
    }

    #[test]
    fn test_total_header_never_maps_to_price() {
        let rows = vec![raw_row(&[
            ("date", "2024-01-01"),
            ("product", "Blood Bag"),
            ("qty", "2"),
            ("Total incl. VAT", "200"),
        ])];
        let mapped = map_field_names(rows);
        assert_eq!(mapped.field_map["Total incl. VAT"], "total");
        assert!(!mapped.field_map.values().any(|v| v == "price"));
    }

    #[test]
    fn test_bare_price_never_maps_to_total() {
        let rows = vec![raw_row(&[("Price", "100")])];
        let mapped = map_field_names(rows);
        assert_eq!(mapped.field_map["Price"], "price");
    }

    #[test]
    fn test_header_consumed_once() {
        // "name" is a productName synonym; it must not be re-used by
        // another field once claimed.
        let rows = vec![raw_row(&[("name", "Blood Bag")])];
        let mapped = map_field_names(rows);
        assert_eq!(mapped.field_map.len(), 1);
        assert_eq!(mapped.field_map["name"], "productName");
    }

    #[test]
    fn test_missing_required_fields_named() {
        let rows = vec![raw_row(&[("date", "2024-01-01"), ("product", "x")])];
        let mapped = map_field_names(rows);
        let missing = missing_required_fields(&mapped.rows);
        assert_eq!(missing, vec!["quantity".to_string(), "price".to_string()]);
    }

    #[test]
    fn test_empty_rows_report_all_required() {
        assert_eq!(missing_required_fields(&[]).len(), 4);
    }
}
