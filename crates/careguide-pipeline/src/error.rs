use careguide_bedrock::error::BedrockError;
use careguide_core::error::CoreError;
use careguide_guidelines::error::GuidelineError;
use thiserror::Error;

use crate::state::PipelineState;

/// Coarse failure classes reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The hosted model could not be reached or refused the credentials.
    NetworkOrAuth,
    /// A model call exceeded its local deadline.
    Timeout,
    /// A model reply failed schema or semantic checks after repair.
    Validation,
    /// The input record or guideline table is unusable.
    Data,
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::NetworkOrAuth => "network/auth",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Validation => "validation",
            ErrorKind::Data => "data",
            ErrorKind::Config => "config",
        })
    }
}

/// A failure inside one pipeline step or follow-up call.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Model(#[from] BedrockError),

    #[error(transparent)]
    Guidelines(#[from] GuidelineError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    Data(String),
}

impl StepError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StepError::Model(BedrockError::Invocation(_)) => ErrorKind::NetworkOrAuth,
            StepError::Model(BedrockError::Timeout { .. }) => ErrorKind::Timeout,
            StepError::Model(_) => ErrorKind::Validation,
            StepError::Guidelines(_) | StepError::Data(_) => ErrorKind::Data,
            StepError::Core(CoreError::InvalidWeight { .. }) => ErrorKind::Config,
            StepError::Core(_) => ErrorKind::Data,
        }
    }
}

/// The pipeline halted while producing `state`.
#[derive(Debug, Error)]
#[error("pipeline halted at {state} ({kind}): {source}", kind = .source.kind())]
pub struct PipelineError {
    pub state: PipelineState,
    #[source]
    pub source: StepError,
}

impl PipelineError {
    pub fn new(state: PipelineState, source: impl Into<StepError>) -> Self {
        Self {
            state,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}
