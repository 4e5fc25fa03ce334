//! Domain models for the bloodbank system.

mod donor;
mod ingest;
mod pivot;

pub use donor::*;
pub use ingest::*;
pub use pivot::*;
