//! Donor identity assignment.
//!
//! Records entered through the form or an import may arrive without an id.
//! Identity resolution is deterministic for owned, name-bearing animals
//! (same owner+name always resolves to the same id, which is what makes
//! edit-in-place work across sessions) and opaque for anonymous cats, so
//! unrelated unnamed cats never collapse into one individual.
//!
//! The owner+name concatenation can collide across unrelated animals with
//! the same names. That is a known, accepted limitation: downstream edit
//! matching depends on this exact determinism, so it must not be changed.

use serde_json::Value;
use uuid::Uuid;

use crate::models::DonorRecord;

/// A name is meaningful iff it contains at least one Latin or Hebrew letter
/// and is not purely digits. Kennel numbers like "1234" fail the test.
pub fn is_meaningful_name(name: &str) -> bool {
    let has_letters = name
        .chars()
        .any(|c| c.is_ascii_alphabetic() || ('\u{0590}'..='\u{05FF}').contains(&c));
    let trimmed = name.trim();
    let only_digits = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit());
    has_letters && !only_digits
}

/// The deterministic identity key for an owned, name-bearing animal.
pub fn identity_key(animal_name: &str, owner_name: &str) -> String {
    format!(
        "{}_{}",
        animal_name.trim().to_lowercase(),
        owner_name.trim().to_lowercase()
    )
}

/// Assign an id to a single record if it lacks one.
pub fn assign_id(donor: &mut DonorRecord) {
    if !donor.id.is_empty() {
        return;
    }
    // Anonymous cats stay distinct individuals.
    if donor.is_cat() && !is_meaningful_name(&donor.animal_name) {
        donor.id = Uuid::new_v4().to_string();
        return;
    }
    donor.id = identity_key(&donor.animal_name, &donor.owner_name);
}

/// Normalize a collection: every returned record carries a non-empty id.
/// Records that already have one pass through unchanged.
pub fn normalize_records(mut donors: Vec<DonorRecord>) -> Vec<DonorRecord> {
    for donor in &mut donors {
        assign_id(donor);
    }
    donors
}

/// Lenient entry point for imports and restores: raw JSON values that fail
/// to deserialize (non-objects, wrong shapes) degrade to an empty record
/// with a fresh random id instead of failing the whole collection.
pub fn normalize_raw(values: Vec<Value>) -> Vec<DonorRecord> {
    values
        .into_iter()
        .map(|value| match serde_json::from_value::<DonorRecord>(value) {
            Ok(mut donor) => {
                assign_id(&mut donor);
                donor
            }
            Err(_) => DonorRecord {
                id: Uuid::new_v4().to_string(),
                ..Default::default()
            },
        })
        .collect()
}
