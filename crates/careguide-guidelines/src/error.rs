use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuidelineError {
    #[error("failed to read guideline file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed guideline file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}
