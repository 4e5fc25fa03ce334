//! Donation eligibility windows and highlighting.
//!
//! Two different 90-day windows coexist on purpose and must not be unified:
//!
//! * the table highlight opens 7 days before `date + 90` and closes 14 days
//!   after it (diff range -7..=14);
//! * the upcoming-donor list accepts 90..=97 days since the last donation
//!   and therefore never shows the 98+ day overdue range the highlight
//!   still flags.
//!
//! The asymmetry mirrors how the clinic actually works the lists; both
//! boundaries are pinned by tests.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};

use crate::donors::identity::is_meaningful_name;
use crate::models::DonorRecord;

/// Days between donations.
pub const DONATION_INTERVAL_DAYS: i64 = 90;

/// Highlight window relative to the next-eligible date, in days.
pub const HIGHLIGHT_BEFORE_DAYS: i64 = 7;
pub const HIGHLIGHT_AFTER_DAYS: i64 = 14;

/// Upcoming-donor acceptance window, in days since the last donation.
pub const UPCOMING_MIN_DAYS: i64 = 90;
pub const UPCOMING_MAX_DAYS: i64 = 97;

/// Whether a record should be visually flagged as actionable on `today`.
///
/// Only dogs and cats with a meaningful name and a parseable date are
/// eligibility-relevant. Suppression (by highlight key) always wins.
pub fn is_highlighted(donor: &DonorRecord, suppressed: &HashSet<String>, today: NaiveDate) -> bool {
    if !donor.is_dog() && !donor.is_cat() {
        return false;
    }
    if !is_meaningful_name(&donor.animal_name) {
        return false;
    }
    let Some(donation_date) = donor.parsed_date() else {
        return false;
    };

    let next_eligible = donation_date + Duration::days(DONATION_INTERVAL_DAYS);
    let diff_days = (today - next_eligible).num_days();
    let in_window = (-HIGHLIGHT_BEFORE_DAYS..=HIGHLIGHT_AFTER_DAYS).contains(&diff_days);

    in_window && !suppressed.contains(&donor.highlight_key())
}

/// Collapse to the most recent record per (animal name, location) pair.
/// Records without a name, location, or parseable date are skipped.
fn latest_by_name_and_location(donors: &[DonorRecord]) -> Vec<DonorRecord> {
    let mut latest: HashMap<(String, String), (NaiveDate, &DonorRecord)> = HashMap::new();
    let mut order: Vec<(String, String)> = Vec::new();

    for donor in donors {
        if donor.animal_name.is_empty() || donor.location.is_empty() {
            continue;
        }
        let Some(date) = donor.parsed_date() else {
            continue;
        };
        let key = (donor.animal_name.clone(), donor.location.clone());
        match latest.get(&key) {
            Some((existing, _)) if *existing >= date => {}
            Some(_) => {
                latest.insert(key, (date, donor));
            }
            None => {
                order.push(key.clone());
                latest.insert(key, (date, donor));
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| latest.get(&key).map(|(_, d)| (*d).clone()))
        .collect()
}

/// Donors whose last donation was 90..=97 days ago, one row per
/// (animal name, location), latest record wins.
pub fn upcoming_donors(donors: &[DonorRecord], today: NaiveDate) -> Vec<DonorRecord> {
    latest_by_name_and_location(donors)
        .into_iter()
        .filter(|donor| {
            donor
                .parsed_date()
                .map(|date| {
                    let days = (today - date).num_days();
                    (UPCOMING_MIN_DAYS..=UPCOMING_MAX_DAYS).contains(&days)
                })
                .unwrap_or(false)
        })
        .collect()
}

/// Mark a donor as having donated today: reset `date` to today and `next`
/// to today + 90 days, mutating the matching record in place. Matching is
/// by (animal name, location, date) — the same triple the upcoming list
/// displays.
pub fn mark_donated(donors: &mut [DonorRecord], target: &DonorRecord, today: NaiveDate) {
    let next = today + Duration::days(DONATION_INTERVAL_DAYS);
    for donor in donors.iter_mut() {
        if donor.animal_name == target.animal_name
            && donor.location == target.location
            && donor.date == target.date
        {
            donor.date = today.to_string();
            donor.next = next.to_string();
        }
    }
}
