//! Merge policies for imports and restores.

use crate::donors::dedupe::dedupe_exact;
use crate::donors::identity::normalize_records;
use crate::models::DonorRecord;

/// Append/upsert policy, used by JSON imports and form submissions.
///
/// Incoming records are normalized, then upserted by resolved id — an
/// existing record with the same id is replaced in place, preserving its
/// position (that is the edit intent) — and unknown ids are appended.
/// The combined collection is then deduplicated by clinical fingerprint,
/// which cleans up accidental exact repeats. The ordering matters: id
/// upsert first, content dedup last.
pub fn merge_append(current: Vec<DonorRecord>, incoming: Vec<DonorRecord>) -> Vec<DonorRecord> {
    let mut merged = normalize_records(current);
    for donor in normalize_records(incoming) {
        match merged.iter_mut().find(|existing| existing.id == donor.id) {
            Some(existing) => *existing = donor,
            None => merged.push(donor),
        }
    }
    dedupe_exact(merged)
}

/// Replace policy, used by restore-from-backup. Destructive: the incoming
/// collection becomes the whole truth. Upstream is responsible for user
/// confirmation.
pub fn merge_replace(incoming: Vec<DonorRecord>) -> Vec<DonorRecord> {
    dedupe_exact(normalize_records(incoming))
}

/// Single-record upsert, the form-submission path.
pub fn upsert_donor(current: Vec<DonorRecord>, donor: DonorRecord) -> Vec<DonorRecord> {
    merge_append(current, vec![donor])
}
