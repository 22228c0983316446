//! careguide-guidelines
//!
//! The static preventive-care guideline table used as retrieval context.
//! Pure data and matching rules, no AWS dependency.

pub mod catalog;
pub mod error;
pub mod select;

pub use catalog::{Guideline, GuidelineTable};
pub use select::{FALLBACK_COUNT, MAX_SELECTED, select};
