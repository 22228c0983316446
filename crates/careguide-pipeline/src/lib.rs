//! careguide-pipeline
//!
//! The assessment pipeline: configuration, the per-step model calls, the
//! forward-only state machine that sequences them, and the follow-up
//! agents that work from a finished report.

pub mod config;
pub mod error;
pub mod followup;
pub mod loader;
pub mod orchestrator;
pub mod prompts;
pub mod scrub;
pub mod state;
pub mod steps;

pub use config::{CareGuideConfig, DeidMode};
pub use error::{ErrorKind, PipelineError, StepError};
pub use orchestrator::Pipeline;
pub use state::PipelineState;
