//! Record context builder.
//!
//! A patient record may arrive as several text files (one per provider).
//! They are joined into one record text before de-identification so that
//! every later step, and every quote check, works on a single document.

use serde::{Deserialize, Serialize};

/// A record file with its text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFile {
    pub filename: String,
    pub text: String,
}

/// Join record files into a single record text.
///
/// A single file is passed through unchanged. Several files are wrapped in
/// an XML-style block with one numbered section per file. File names are
/// left out; they often carry the patient's name.
pub fn build_record_text(files: &[RecordFile]) -> String {
    match files {
        [] => String::new(),
        [only] => only.text.clone(),
        _ => {
            let mut block = String::from("<record_context>\n");

            for (index, file) in files.iter().enumerate() {
                block.push_str(&format!("<file index=\"{}\">\n", index + 1));
                block.push_str(&file.text);
                if !file.text.ends_with('\n') {
                    block.push('\n');
                }
                block.push_str("</file>\n");
            }

            block.push_str("</record_context>");
            block
        }
    }
}
