//! Exact-duplicate removal by clinical-content fingerprint.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::models::DonorRecord;

/// Content fingerprint of a donor record.
///
/// Hashes a canonical JSON serialization of the fixed clinical field subset.
/// Identity and owner-contact fields (id, ownerName, ownerPhone,
/// isPrivateOwner) are deliberately excluded: re-importing the same clinical
/// event with an edited owner contact still collapses to one record.
/// Comparison is exact-match; numeric strings are compared as-is.
pub fn fingerprint(donor: &DonorRecord) -> String {
    let payload = serde_json::json!({
        "animalName": donor.animal_name,
        "date": donor.date,
        "location": donor.location,
        "age": donor.age,
        "weight": donor.weight,
        "gender": donor.gender,
        "animalType": donor.animal_type,
        "bloodType": donor.blood_type,
        "pcv": donor.pcv,
        "hct": donor.hct,
        "wbc": donor.wbc,
        "plt": donor.plt,
        "fiv": donor.fiv,
        "felv": donor.felv,
        "packedCell": donor.packed_cell,
        "slideFindings": donor.slide_findings,
        "donated": donor.donated,
        "volume": donor.volume,
        "notes": donor.notes,
    });
    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Remove exact content duplicates, keeping the first occurrence.
/// Order-preserving and idempotent.
pub fn dedupe_exact(donors: Vec<DonorRecord>) -> Vec<DonorRecord> {
    let mut seen = HashSet::new();
    donors
        .into_iter()
        .filter(|donor| seen.insert(fingerprint(donor)))
        .collect()
}
