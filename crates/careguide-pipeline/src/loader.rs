use std::path::Path;

use careguide_bedrock::context::RecordFile;
use careguide_guidelines::GuidelineTable;
use tracing::info;

use crate::error::{PipelineError, StepError};
use crate::state::PipelineState;

/// Load the guideline table before a run. A missing file gives an empty
/// table; an unreadable or malformed one halts at `Loaded`.
pub fn load_guidelines(path: &Path) -> Result<GuidelineTable, PipelineError> {
    GuidelineTable::load(path).map_err(|e| PipelineError::new(PipelineState::Loaded, e))
}

/// Read each path as UTF-8 text. Any unreadable file fails the whole load.
pub fn load_record_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RecordFile>, StepError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StepError::Data(format!("failed to read record file {}: {e}", path.display())))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!(filename = %filename, bytes = text.len(), "loaded record file");
        files.push(RecordFile { filename, text });
    }
    Ok(files)
}
