//! careguide-export
//!
//! Report persistence (timestamped JSON files) and Markdown rendering.

pub mod error;
pub mod json;
pub mod render;
