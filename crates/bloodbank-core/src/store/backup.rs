//! Backup, restore, and import of the donor collection as JSON blobs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{DonorStore, KeyValueStore, StoreError, StoreResult};
use crate::donors::{merge_append, merge_replace, normalize_raw};

/// File name used for the on-disk donor backup.
pub const BACKUP_FILE: &str = "donor_backup.json";

/// Named blob storage for backup payloads.
pub trait BlobStore {
    fn read(&self, name: &str) -> StoreResult<Option<String>>;
    fn write(&self, name: &str, contents: &str) -> StoreResult<()>;
}

/// Filesystem-backed blob store rooted at a directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl BlobStore for FsBlobStore {
    fn read(&self, name: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, name: &str, contents: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(name), contents)?;
        Ok(())
    }
}

/// Write the current donor collection to [`BACKUP_FILE`].
/// Returns the number of records backed up.
pub fn backup_donors<S, B>(store: &DonorStore<S>, blobs: &B) -> StoreResult<usize>
where
    S: KeyValueStore,
    B: BlobStore,
{
    let donors = store.donors();
    let payload = serde_json::to_string(&donors)?;
    blobs.write(BACKUP_FILE, &payload)?;
    info!(count = donors.len(), "donor backup written");
    Ok(donors.len())
}

/// Replace the donor collection from [`BACKUP_FILE`].
///
/// The payload is parsed leniently: each entry is normalized on its own,
/// so a malformed record degrades to a blank donor instead of failing
/// the whole restore. Returns the restored record count.
pub fn restore_donors<S, B>(store: &DonorStore<S>, blobs: &B) -> StoreResult<usize>
where
    S: KeyValueStore,
    B: BlobStore,
{
    let payload = blobs
        .read(BACKUP_FILE)?
        .ok_or_else(|| StoreError::NotFound(BACKUP_FILE.to_string()))?;
    let raw: Vec<serde_json::Value> = serde_json::from_str(&payload)?;
    let donors = merge_replace(normalize_raw(raw));
    store.save_donors(&donors);
    info!(count = donors.len(), "donor collection restored from backup");
    Ok(donors.len())
}

/// Merge a JSON array of donor records into the current collection.
/// Records with known ids are updated in place; new records append.
/// Returns the collection size after the merge.
pub fn import_donors<S>(store: &DonorStore<S>, payload: &str) -> StoreResult<usize>
where
    S: KeyValueStore,
{
    let raw: Vec<serde_json::Value> = serde_json::from_str(payload)?;
    let incoming = normalize_raw(raw);
    let merged = merge_append(store.donors(), incoming);
    store.save_donors(&merged);
    info!(count = merged.len(), "donor import merged");
    Ok(merged.len())
}
