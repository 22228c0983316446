//! careguide-core
//!
//! Pure domain types, model response schemas, and engagement scoring.
//! No AWS SDK dependency; this is the shared vocabulary of the CareGuide
//! pipeline.

pub mod error;
pub mod models;
pub mod schema;
pub mod scoring;
