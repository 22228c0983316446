use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model call timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to expected schema: {0}")]
    SchemaViolation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BedrockError {
    /// Whether the error came from the model's output rather than from
    /// reaching the model.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BedrockError::ResponseParse(_) | BedrockError::SchemaViolation(_)
        )
    }
}
