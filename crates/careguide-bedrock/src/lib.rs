//! careguide-bedrock
//!
//! Hosted model invocation (Bedrock Converse) and the structured-output
//! boundary every pipeline step goes through.

pub mod chat;
pub mod client;
pub mod context;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod replay;
pub mod tokens;
pub mod transaction;
