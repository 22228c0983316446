use std::path::Path;

use careguide_core::models::recommendation::EvidenceGrade;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use crate::error::GuidelineError;

/// One row of the guideline table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guideline {
    pub title: String,
    pub description: String,
    /// Free-text population, e.g. "Adults aged 45 to 75 years".
    pub population: String,
    pub grade: EvidenceGrade,
    pub category: String,
    /// Clinical terms that make this guideline relevant. Matched
    /// case-insensitively against the patient's conditions and risk factors.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The guideline table, in file order. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct GuidelineTable {
    guidelines: Vec<Guideline>,
}

impl GuidelineTable {
    pub fn new(guidelines: Vec<Guideline>) -> Self {
        Self { guidelines }
    }

    /// Load the table from a JSON array on disk.
    ///
    /// A missing file yields an empty table; the guideline source then
    /// contributes nothing. An unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, GuidelineError> {
        if !path.exists() {
            warn!(path = %path.display(), "guideline file not found, continuing without guidelines");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| GuidelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let guidelines: Vec<Guideline> =
            serde_json::from_str(&text).map_err(|source| GuidelineError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), count = guidelines.len(), "loaded guideline table");
        Ok(Self { guidelines })
    }

    pub fn guidelines(&self) -> &[Guideline] {
        &self.guidelines
    }

    pub fn len(&self) -> usize {
        self.guidelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guidelines.is_empty()
    }
}

/// Format selected guidelines as prompt context, one block per guideline.
pub fn to_prompt_text(guidelines: &[&Guideline]) -> String {
    guidelines
        .iter()
        .map(|g| {
            format!(
                "Title: {}\nDescription: {}\nPopulation: {}\nGrade: {}",
                g.title, g.description, g.population, g.grade
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
