//! The donor engine: identity, dedup, eligibility, merge, validation.

mod dedupe;
mod eligibility;
mod identity;
mod merge;
mod validate;

pub use dedupe::*;
pub use eligibility::*;
pub use identity::*;
pub use merge::*;
pub use validate::*;
