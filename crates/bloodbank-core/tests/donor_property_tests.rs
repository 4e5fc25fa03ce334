//! Property tests for donor normalization, dedup, and merge.

use proptest::prelude::*;

use bloodbank_core::donors::{dedupe_exact, merge_append, normalize_records};
use bloodbank_core::models::DonorRecord;

fn donor_strategy() -> impl Strategy<Value = DonorRecord> {
    (
        "[a-zA-Z]{1,12}",
        "[a-zA-Z]{1,12}",
        prop_oneof![Just("dog"), Just("cat")],
        prop_oneof![Just("רחובות"), Just("חולון"), Just("פתחיה")],
        prop_oneof![Just("2024-01-15"), Just("2024-03-03"), Just("15/01/2024")],
    )
        .prop_map(|(animal, owner, animal_type, location, date)| DonorRecord {
            animal_name: animal,
            owner_name: owner,
            animal_type: animal_type.to_string(),
            location: location.to_string(),
            date: date.to_string(),
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn normalized_donors_always_have_ids(donors in prop::collection::vec(donor_strategy(), 0..20)) {
        for donor in normalize_records(donors) {
            prop_assert!(!donor.id.is_empty());
        }
    }

    #[test]
    fn same_animal_and_owner_get_same_id(donor in donor_strategy()) {
        let a = normalize_records(vec![donor.clone()]);
        let b = normalize_records(vec![donor]);
        prop_assert_eq!(&a[0].id, &b[0].id);
    }

    #[test]
    fn dedupe_is_idempotent(donors in prop::collection::vec(donor_strategy(), 0..20)) {
        let once = dedupe_exact(normalize_records(donors));
        let twice = dedupe_exact(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dedupe_preserves_first_seen_order(donors in prop::collection::vec(donor_strategy(), 0..20)) {
        let normalized = normalize_records(donors);
        let deduped = dedupe_exact(normalized.clone());

        // Survivors appear in their original relative order.
        let mut cursor = normalized.iter();
        for survivor in &deduped {
            prop_assert!(cursor.any(|d| d == survivor));
        }
    }

    #[test]
    fn merging_nothing_changes_nothing(donors in prop::collection::vec(donor_strategy(), 0..20)) {
        let current = dedupe_exact(normalize_records(donors));
        let merged = merge_append(current.clone(), Vec::new());
        prop_assert_eq!(current, merged);
    }

    #[test]
    fn merge_never_grows_beyond_inputs(
        current in prop::collection::vec(donor_strategy(), 0..15),
        incoming in prop::collection::vec(donor_strategy(), 0..15),
    ) {
        let bound = current.len() + incoming.len();
        let merged = merge_append(current, incoming);
        prop_assert!(merged.len() <= bound);
    }

    #[test]
    fn merge_output_is_already_deduplicated(
        current in prop::collection::vec(donor_strategy(), 0..15),
        incoming in prop::collection::vec(donor_strategy(), 0..15),
    ) {
        let merged = merge_append(current, incoming);
        prop_assert_eq!(dedupe_exact(merged.clone()), merged);
    }
}
