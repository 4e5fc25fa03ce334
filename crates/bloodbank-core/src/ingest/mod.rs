//! Spreadsheet, CSV, and JSON upload ingestion.

mod format;
mod mapping;
mod pipeline;
mod probe;
mod row;

pub use format::*;
pub use mapping::*;
pub use pipeline::*;
pub use probe::*;
pub use row::*;
