//! Bloodbank Core Library
//!
//! Local-first donor registry for an animal blood bank: normalization,
//! deduplication, and eligibility tracking for dog and cat donors, plus
//! ingestion of clinic spreadsheet exports.
//!
//! # Architecture
//!
//! ```text
//! Upload (.csv/.xlsx/.xls/.json)          Donor entry / import
//!             │                                   │
//!     header detection                     normalize (assign ids)
//!     field mapping                               │
//!     row normalization                    dedupe (fingerprint)
//!     dedup + summary                             │
//!             │                            ┌──────▼──────┐
//!             ▼                            │ DonorStore  │
//!     NormalizedRow list                   │  (KV-backed)│
//!                                          └──────┬──────┘
//!                             ┌────────────────────┼────────────────────┐
//!                             │                    │                    │
//!                             ▼                    ▼                    ▼
//!                        Eligibility          Monthly pivot        Backup /
//!                        highlights           (per location)       restore
//! ```
//!
//! # Core Principle
//!
//! **Identity is deterministic.** The same animal and owner always get
//! the same id, so repeated imports update records instead of
//! multiplying them. Only anonymous shelter cats get random ids.
//!
//! # Modules
//!
//! - [`models`]: Domain types (DonorRecord, NormalizedRow, PivotRow, etc.)
//! - [`donors`]: Identity, dedup, eligibility, merge, validation
//! - [`store`]: Key-value persistence, donor store facade, backup
//! - [`pivot`]: Monthly per-location donation counts
//! - [`ingest`]: Spreadsheet/CSV/JSON upload pipeline

pub mod donors;
pub mod ingest;
pub mod models;
pub mod pivot;
pub mod store;

// Re-export commonly used types
pub use donors::{
    dedupe_exact, is_highlighted, mark_donated, merge_append, merge_replace, normalize_raw,
    normalize_records, sanitize_donor, upcoming_donors, upsert_donor, validate_donor,
};
pub use ingest::{ingest, try_ingest, IngestError};
pub use models::{
    DonorRecord, IngestOutcome, IngestReport, IngestSummary, NormalizedRow, PivotRow,
    DEFAULT_LOCATION, LOCATIONS,
};
pub use pivot::{build_pivot, month_details};
pub use store::{
    BlobStore, DonorStore, FsBlobStore, KeyValueStore, MemoryStore, SqliteStore, StoreError,
    StoreResult,
};
