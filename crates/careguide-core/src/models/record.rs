/// One patient's health record for the duration of a single run.
///
/// `raw_text` is only ever handed to the de-identification step; every later
/// step reads `deidentified_text`. The record is never serialized.
#[derive(Debug, Clone)]
pub struct PatientRecord {
    pub sources: Vec<String>,
    pub raw_text: String,
    pub deidentified_text: String,
}

impl PatientRecord {
    pub fn new(sources: Vec<String>, raw_text: String, deidentified_text: String) -> Self {
        Self {
            sources,
            raw_text,
            deidentified_text,
        }
    }

    /// Whether `quote` appears verbatim in the de-identified text.
    pub fn contains_quote(&self, quote: &str) -> bool {
        !quote.is_empty() && self.deidentified_text.contains(quote)
    }
}
