//! Golden tests for donation eligibility windows.
//!
//! Two windows exist on purpose and they are not the same: the roster
//! highlight opens a week before the 90-day mark and closes two weeks
//! after it, while the upcoming-donor list only covers the week
//! starting at day 90.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use bloodbank_core::donors::{is_highlighted, mark_donated, upcoming_donors};
use bloodbank_core::models::DonorRecord;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn donor(animal: &str, days_ago: i64) -> DonorRecord {
    let date = today() - Duration::days(days_ago);
    DonorRecord {
        id: format!("{}_cohen", animal.to_lowercase()),
        animal_name: animal.to_string(),
        owner_name: "Cohen".to_string(),
        animal_type: "dog".to_string(),
        location: "רחובות".to_string(),
        date: date.to_string(),
        ..Default::default()
    }
}

struct WindowCase {
    id: &'static str,
    days_since_donation: i64,
    highlighted: bool,
    upcoming: bool,
}

fn window_cases() -> Vec<WindowCase> {
    vec![
        WindowCase {
            id: "exactly-90-days",
            days_since_donation: 90,
            highlighted: true,
            upcoming: true,
        },
        WindowCase {
            id: "week-before-due",
            days_since_donation: 83,
            highlighted: true,
            upcoming: false,
        },
        WindowCase {
            id: "too-early",
            days_since_donation: 82,
            highlighted: false,
            upcoming: false,
        },
        WindowCase {
            id: "end-of-upcoming-week",
            days_since_donation: 97,
            highlighted: true,
            upcoming: true,
        },
        WindowCase {
            id: "past-upcoming-still-highlighted",
            days_since_donation: 98,
            highlighted: true,
            upcoming: false,
        },
        WindowCase {
            id: "two-weeks-overdue",
            days_since_donation: 104,
            highlighted: true,
            upcoming: false,
        },
        WindowCase {
            id: "past-both-windows",
            days_since_donation: 105,
            highlighted: false,
            upcoming: false,
        },
        WindowCase {
            id: "donated-yesterday",
            days_since_donation: 1,
            highlighted: false,
            upcoming: false,
        },
    ]
}

#[test]
fn test_window_golden_cases() {
    let suppressed = HashSet::new();

    for case in window_cases() {
        let record = donor("Rex", case.days_since_donation);

        assert_eq!(
            is_highlighted(&record, &suppressed, today()),
            case.highlighted,
            "highlight mismatch for case {}",
            case.id
        );

        let upcoming = upcoming_donors(std::slice::from_ref(&record), today());
        assert_eq!(
            !upcoming.is_empty(),
            case.upcoming,
            "upcoming mismatch for case {}",
            case.id
        );
    }
}

#[test]
fn test_windows_are_deliberately_different() {
    let cases = window_cases();
    assert!(
        cases.iter().any(|c| c.highlighted && !c.upcoming),
        "highlight window must extend beyond the upcoming week"
    );
}

#[test]
fn test_suppression_hides_highlight() {
    let record = donor("Rex", 90);
    let mut suppressed = HashSet::new();
    assert!(is_highlighted(&record, &suppressed, today()));

    suppressed.insert(record.highlight_key());
    assert!(!is_highlighted(&record, &suppressed, today()));
}

#[test]
fn test_suppression_round_trips_through_store() {
    use bloodbank_core::store::{DonorStore, MemoryStore};

    let record = donor("Rex", 90);
    let store = DonorStore::new(MemoryStore::new());
    assert!(store.suppress_highlight(&record.highlight_key()));

    let suppressed = store.removed_highlights();
    assert!(!is_highlighted(&record, &suppressed, today()));
}

#[test]
fn test_anonymous_cat_never_highlighted() {
    let mut record = donor("12345", 90);
    record.animal_type = "cat".to_string();
    assert!(!is_highlighted(&record, &HashSet::new(), today()));
}

#[test]
fn test_unparseable_date_never_highlighted() {
    let mut record = donor("Rex", 90);
    record.date = "soon".to_string();
    assert!(!is_highlighted(&record, &HashSet::new(), today()));
}

#[test]
fn test_mark_donated_resets_both_windows() {
    let mut donors = vec![donor("Rex", 92)];
    let target = donors[0].clone();
    assert!(!upcoming_donors(&donors, today()).is_empty());

    mark_donated(&mut donors, &target, today());

    assert_eq!(donors[0].date, today().to_string());
    assert_eq!(
        donors[0].next,
        (today() + Duration::days(90)).to_string()
    );
    assert!(upcoming_donors(&donors, today()).is_empty());
    assert!(!is_highlighted(&donors[0], &HashSet::new(), today()));
}
