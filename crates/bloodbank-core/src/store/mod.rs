//! Persistence facade.
//!
//! The app runs on a single operator device: one process, one persisted
//! key-value store, full-collection read-modify-write cycles, last write
//! wins. The store is an injected capability — [`MemoryStore`] for tests,
//! [`SqliteStore`] in production — and every read is fail-soft: a failure
//! is logged and a safe default returned, never an error to the caller.

pub mod backup;
mod memory;
mod sqlite;

pub use backup::{BlobStore, FsBlobStore};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{DonorRecord, DEFAULT_LOCATION};

/// Persisted store keys.
pub mod keys {
    pub const DONORS: &str = "animal_donors";
    pub const EDITING_DONOR: &str = "editing_donor";
    pub const LAST_LOCATION: &str = "last_location";
    pub const LAST_DATE: &str = "last_date";
    pub const ACTIVE_LOCATION: &str = "active_location";
    pub const REMOVED_HIGHLIGHTS: &str = "removed_highlights";
}

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Abstract key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Donor-facing facade over a key-value store.
///
/// `save_donors` expects a pre-normalized, pre-deduplicated collection;
/// the store performs no validation of its own.
pub struct DonorStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> DonorStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn donors(&self) -> Vec<DonorRecord> {
        self.get_json(keys::DONORS)
    }

    pub fn save_donors(&self, donors: &[DonorRecord]) -> bool {
        self.set_json(keys::DONORS, &donors)
    }

    pub fn editing_donor(&self) -> Option<DonorRecord> {
        self.get_json(keys::EDITING_DONOR)
    }

    pub fn save_editing_donor(&self, donor: &DonorRecord) -> bool {
        self.set_json(keys::EDITING_DONOR, donor)
    }

    pub fn clear_editing_donor(&self) -> bool {
        match self.store.remove(keys::EDITING_DONOR) {
            Ok(()) => true,
            Err(err) => {
                warn!(key = keys::EDITING_DONOR, %err, "store remove failed");
                false
            }
        }
    }

    pub fn last_location(&self) -> String {
        self.get_string(keys::LAST_LOCATION, "")
    }

    pub fn set_last_location(&self, location: &str) -> bool {
        self.set_string(keys::LAST_LOCATION, location)
    }

    pub fn last_date(&self) -> String {
        self.get_string(keys::LAST_DATE, "")
    }

    pub fn set_last_date(&self, date: &str) -> bool {
        self.set_string(keys::LAST_DATE, date)
    }

    /// Active location tab; defaults to the main collection site.
    pub fn active_location(&self) -> String {
        self.get_string(keys::ACTIVE_LOCATION, DEFAULT_LOCATION)
    }

    pub fn set_active_location(&self, location: &str) -> bool {
        self.set_string(keys::ACTIVE_LOCATION, location)
    }

    /// Highlight keys the operator has dismissed. Sticky until cleared.
    pub fn removed_highlights(&self) -> HashSet<String> {
        self.get_json::<Vec<String>>(keys::REMOVED_HIGHLIGHTS)
            .into_iter()
            .collect()
    }

    pub fn save_removed_highlights(&self, highlights: &HashSet<String>) -> bool {
        let mut sorted: Vec<&String> = highlights.iter().collect();
        sorted.sort();
        self.set_json(keys::REMOVED_HIGHLIGHTS, &sorted)
    }

    /// Add one highlight key to the suppressed set.
    pub fn suppress_highlight(&self, key: &str) -> bool {
        let mut highlights = self.removed_highlights();
        highlights.insert(key.to_string());
        self.save_removed_highlights(&highlights)
    }

    fn get_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!(key, %err, "store read failed, using default");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "stored JSON failed to parse, using default");
                T::default()
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, %err, "JSON serialization failed");
                return false;
            }
        };
        self.set_string(key, &raw)
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.store.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(err) => {
                warn!(key, %err, "store read failed, using default");
                default.to_string()
            }
        }
    }

    fn set_string(&self, key: &str, value: &str) -> bool {
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(err) => {
                warn!(key, %err, "store write failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_on_empty_store() {
        let store = DonorStore::new(MemoryStore::new());
        assert!(store.donors().is_empty());
        assert_eq!(store.last_location(), "");
        assert_eq!(store.active_location(), DEFAULT_LOCATION);
        assert!(store.removed_highlights().is_empty());
        assert!(store.editing_donor().is_none());
    }

    #[test]
    fn test_donor_round_trip() {
        let store = DonorStore::new(MemoryStore::new());
        let donors = vec![DonorRecord {
            id: "rex_cohen".into(),
            animal_name: "Rex".into(),
            ..Default::default()
        }];
        assert!(store.save_donors(&donors));
        assert_eq!(store.donors(), donors);
    }

    #[test]
    fn test_corrupt_json_degrades_to_default() {
        let mem = MemoryStore::new();
        mem.set(keys::DONORS, "{not json").unwrap();
        let store = DonorStore::new(mem);
        assert!(store.donors().is_empty());
    }

    #[test]
    fn test_suppression_persists() {
        let store = DonorStore::new(MemoryStore::new());
        assert!(store.suppress_highlight("rex_cohen"));
        assert!(store.suppress_highlight("luna_levi"));
        let set = store.removed_highlights();
        assert!(set.contains("rex_cohen"));
        assert!(set.contains("luna_levi"));
    }

    #[test]
    fn test_scalar_preferences() {
        let store = DonorStore::new(MemoryStore::new());
        assert!(store.set_last_location("חולון"));
        assert!(store.set_last_date("2024-06-01"));
        assert!(store.set_active_location("פתחיה"));
        assert_eq!(store.last_location(), "חולון");
        assert_eq!(store.last_date(), "2024-06-01");
        assert_eq!(store.active_location(), "פתחיה");
    }
}
