//! Donor record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Collection sites. Fixed set; tabs and filters iterate over this.
pub const LOCATIONS: [&str; 5] = ["רחובות", "איגוד ערים דן", "פתחיה", "חולון", "חיצוני"];

/// The location tab shown when no preference has been saved yet.
pub const DEFAULT_LOCATION: &str = "רחובות";

/// Blood type options per species.
pub const DOG_BLOOD_TYPES: [&str; 2] = ["DEA 1.1 Positive", "DEA 1.1 Negative"];
pub const CAT_BLOOD_TYPES: [&str; 3] = ["A", "AB", "B"];

/// One logged animal-blood-donation visit.
///
/// All free-text and numeric fields are strings with empty meaning "absent" —
/// records arrive from forms, JSON imports, and old backups with wildly
/// inconsistent completeness, and every field must survive a round-trip
/// untouched. `id` is empty until normalization assigns one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonorRecord {
    /// Stable identity key; see `donors::identity`.
    pub id: String,
    /// Donation date, ISO `YYYY-MM-DD` or locale `DD/MM/YYYY`.
    pub date: String,
    /// Collection site, one of `LOCATIONS`.
    pub location: String,
    /// Animal name; may be a meaningless placeholder like a kennel number.
    pub animal_name: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub age: String,
    pub weight: String,
    /// Male/Female.
    pub gender: String,
    /// Dog/Cat (free-form, compared case-insensitively).
    pub animal_type: String,
    /// Co-constrained with `animal_type`; see `validate::reset_incompatible_blood_type`.
    pub blood_type: String,
    /// FIV status, cat only (Positive/Negative).
    pub fiv: String,
    /// FeLV status, cat only (Positive/Negative).
    pub felv: String,
    pub pcv: String,
    pub hct: String,
    pub wbc: String,
    pub plt: String,
    pub packed_cell: String,
    pub slide_findings: String,
    /// Yes/No, localized variants accepted ("כן").
    pub donated: String,
    pub volume: String,
    pub notes: String,
    /// Non-institutional owner; surfaced in the manual contact list.
    pub is_private_owner: bool,
    /// Next eligible donation date, written by mark-as-donated.
    pub next: String,
}

impl DonorRecord {
    pub fn is_cat(&self) -> bool {
        self.animal_type.eq_ignore_ascii_case("cat")
    }

    pub fn is_dog(&self) -> bool {
        self.animal_type.eq_ignore_ascii_case("dog")
    }

    /// Key used for highlight suppression: the id, or `name_date` for
    /// records that never got one.
    pub fn highlight_key(&self) -> String {
        if self.id.is_empty() {
            format!("{}_{}", self.animal_name, self.date)
        } else {
            self.id.clone()
        }
    }

    /// Parse the donation date, accepting both stored formats.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_flexible_date(&self.date)
    }
}

/// Parse `YYYY-MM-DD` or `DD/MM/YYYY`. Anything else is None.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}
