//! Monthly donation pivot: per-month, per-location dog/cat counts.
//!
//! Only records whose `donated` answer is affirmative are counted.
//! Months sort newest-first; locations keep first-seen order so the
//! table columns stay stable as data grows.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{DonorRecord, LocationCell, LocationDetail, PivotRow};

/// Month bucket key ("YYYY-MM") for a donor date.
///
/// Accepts ISO dates ("2024-01-15" -> "2024-01") and slash dates
/// ("15/01/2024" -> "2024-01"). Anything else is returned as-is so an
/// odd value still lands in its own visible bucket instead of vanishing.
pub fn month_key(date: &str) -> Option<String> {
    if date.is_empty() {
        return None;
    }
    if date.contains('-') {
        return Some(date.get(..7).unwrap_or(date).to_string());
    }
    if date.contains('/') {
        let parts: Vec<&str> = date.split('/').collect();
        if let [_, month, year] = parts[..] {
            return Some(format!("{year}-{month:0>2}"));
        }
    }
    Some(date.to_string())
}

/// True when the donated answer means yes, in English or Hebrew.
pub fn is_donated_yes(raw: &str) -> bool {
    let answer = raw.trim().to_lowercase();
    answer == "yes" || answer == "כן"
}

/// Display form of a month key: "2024-01" -> "January 2024".
/// Unparseable keys come back unchanged.
pub fn format_month(key: &str) -> String {
    let Some((year, month)) = key.split_once('-') else {
        return key.to_string();
    };
    let parsed = year
        .parse::<i32>()
        .ok()
        .zip(month.parse::<u32>().ok())
        .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1));
    match parsed {
        Some(date) => date.format("%B %Y").to_string(),
        None => key.to_string(),
    }
}

/// Distinct non-empty locations in first-seen order.
pub fn distinct_locations(donors: &[DonorRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for donor in donors {
        if !donor.location.is_empty() && !seen.contains(&donor.location) {
            seen.push(donor.location.clone());
        }
    }
    seen
}

fn counted_months(donors: &[DonorRecord]) -> Vec<String> {
    let mut months = Vec::new();
    for donor in donors {
        if let Some(month) = month_key(&donor.date) {
            if !months.contains(&month) {
                months.push(month);
            }
        }
    }
    months.sort();
    months.reverse();
    months
}

fn count_for(donors: &[DonorRecord]) -> HashMap<(String, String), (u32, u32)> {
    let mut counts: HashMap<(String, String), (u32, u32)> = HashMap::new();
    for donor in donors {
        if !is_donated_yes(&donor.donated) {
            continue;
        }
        let Some(month) = month_key(&donor.date) else {
            continue;
        };
        let entry = counts.entry((month, donor.location.clone())).or_default();
        if donor.is_dog() {
            entry.0 += 1;
        } else if donor.is_cat() {
            entry.1 += 1;
        }
    }
    counts
}

/// Build the monthly pivot: one row per month (newest first), one cell
/// per location, with dog/cat/grand totals.
pub fn build_pivot(donors: &[DonorRecord]) -> Vec<PivotRow> {
    let locations = distinct_locations(donors);
    let months = counted_months(donors);
    let counts = count_for(donors);

    months
        .into_iter()
        .map(|month| {
            let cells: Vec<LocationCell> = locations
                .iter()
                .map(|location| {
                    let (dogs, cats) = counts
                        .get(&(month.clone(), location.clone()))
                        .copied()
                        .unwrap_or_default();
                    LocationCell {
                        location: location.clone(),
                        dogs,
                        cats,
                    }
                })
                .collect();
            let total_dogs = cells.iter().map(|c| c.dogs).sum();
            let total_cats = cells.iter().map(|c| c.cats).sum();
            PivotRow {
                month,
                total_dogs,
                total_cats,
                total: total_dogs + total_cats,
                cells,
            }
        })
        .collect()
}

/// Per-location breakdown for one month, busiest location first.
/// Locations with nothing counted are left out.
pub fn month_details(donors: &[DonorRecord], month: &str) -> Vec<LocationDetail> {
    let counts = count_for(donors);
    let mut details: Vec<LocationDetail> = distinct_locations(donors)
        .into_iter()
        .filter_map(|location| {
            let (dogs, cats) = counts
                .get(&(month.to_string(), location.clone()))
                .copied()
                .unwrap_or_default();
            if dogs == 0 && cats == 0 {
                return None;
            }
            Some(LocationDetail {
                location,
                dogs,
                cats,
                total: dogs + cats,
            })
        })
        .collect();
    details.sort_by(|a, b| b.total.cmp(&a.total));
    details
}
