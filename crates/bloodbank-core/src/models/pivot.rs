//! Pivot table models.

use serde::{Deserialize, Serialize};

/// Per-location cell within a pivot row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCell {
    pub location: String,
    pub dogs: u32,
    pub cats: u32,
}

/// One month of the monthly donor summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRow {
    /// Month key, `YYYY-MM`.
    pub month: String,
    /// One cell per location present in the data, in location order.
    pub cells: Vec<LocationCell>,
    pub total_dogs: u32,
    pub total_cats: u32,
    pub total: u32,
}

/// Drill-down row for a single month: only locations with activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDetail {
    pub location: String,
    pub dogs: u32,
    pub cats: u32,
    pub total: u32,
}
