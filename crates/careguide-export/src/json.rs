use std::path::{Path, PathBuf};

use careguide_core::models::report::HealthReport;
use tracing::info;

use crate::error::ExportError;

/// `assessment_<UTC timestamp>.json`, stamped with the report's generation time.
pub fn report_file_name(report: &HealthReport) -> String {
    format!("assessment_{}.json", report.generated_at.strftime("%Y%m%d_%H%M%S"))
}

/// Write `report` as pretty JSON into `output_dir`, creating the directory
/// if needed. Returns the path written.
pub fn write_report(report: &HealthReport, output_dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ExportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(report_file_name(report));
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(report_id = %report.id, path = %path.display(), "report exported");
    Ok(path)
}

/// Read a report previously written by [`write_report`].
pub fn read_report(path: &Path) -> Result<HealthReport, ExportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}
