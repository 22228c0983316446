use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown recommendation: {0}")]
    UnknownRecommendation(String),

    #[error("invalid scoring weight for {label}: {value}")]
    InvalidWeight { label: String, value: f64 },
}
