//! Local PHI scrub over the HIPAA Safe Harbor categories that have a
//! recognizable surface form: labelled and titled names, dates, phone
//! numbers, email addresses, SSNs, medical record numbers, street addresses
//! and ZIP codes.
//!
//! Used instead of the model de-identification call when configured. It is
//! pattern based and will miss free-form identifiers.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// `(pattern, replacement)` pairs, applied in order. Earlier rules consume
/// digits that later, looser rules would otherwise misread.
const RULES: &[(&str, &str)] = &[
    (r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b", "[EMAIL]"),
    (r"\b\d{3}-\d{2}-\d{4}\b", "[SSN]"),
    (
        r"(?i)\b(MRN|medical record (?:number|no\.?)|patient id)(\s*[:#]?\s*)[A-Z0-9-]*\d[A-Z0-9-]*",
        "${1}${2}[MRN]",
    ),
    (
        r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]\d{4}\b",
        "[PHONE]",
    ),
    (
        r"\b\d{1,5}(?: [A-Z][a-z]+){1,3} (?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Place|Pl)\b\.?",
        "[ADDRESS]",
    ),
    (r"\b([A-Z]{2}) \d{5}(?:-\d{4})?\b", "${1} [ZIP]"),
    (r"\b\d{4}-\d{2}-\d{2}\b", "[DATE]"),
    (r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b", "[DATE]"),
    (
        r"(?i)\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.? \d{1,2}(?:st|nd|rd|th)?,? \d{4}\b",
        "[DATE]",
    ),
    // Safe Harbor permits the year on its own.
    (
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December) (\d{4})\b",
        "[DATE] ${1}",
    ),
    (
        r"(?m)^(\s*(?i:patient(?: name)?|name)\s*:\s*)[A-Z][A-Za-z'.-]*(?: [A-Z][A-Za-z'.-]*){0,3}",
        "${1}[PATIENT_NAME]",
    ),
    (
        r"\b(?:Dr|Mr|Mrs|Ms|Miss)\.? [A-Z][a-z]+(?: [A-Z]\.)?(?: [A-Z][a-z]+)?",
        "[NAME]",
    ),
];

static COMPILED: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    RULES
        .iter()
        .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, *replacement)))
        .collect()
});

/// Replace recognizable identifiers in `text` with bracketed placeholders.
pub fn scrub(text: &str) -> String {
    let mut out = text.to_string();
    let mut replaced = 0usize;
    for (re, replacement) in COMPILED.iter() {
        let hits = re.find_iter(&out).count();
        if hits > 0 {
            replaced += hits;
            out = re.replace_all(&out, *replacement).into_owned();
        }
    }
    debug!(replaced, "local PHI scrub complete");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        assert_eq!(COMPILED.len(), RULES.len());
    }

    #[test]
    fn scrubs_contact_details() {
        let out = scrub("Phone: (555) 212-8841, email m.thompson62@example.com, SSN 123-45-6789");
        assert_eq!(out, "Phone: [PHONE], email [EMAIL], SSN [SSN]");
    }

    #[test]
    fn scrubs_labelled_and_titled_names() {
        let out = scrub("PATIENT: Margaret A. Thompson          DOB: 03/14/1962\nSeen by Dr. Alan Reyes.");
        assert_eq!(out, "PATIENT: [PATIENT_NAME]          DOB: [DATE]\nSeen by [NAME].");
    }

    #[test]
    fn scrubs_mrn_and_address() {
        let out = scrub("MRN: 00482913\nAddress: 418 Willow Creek Road, Springfield, IL 62704");
        assert_eq!(out, "MRN: [MRN]\nAddress: [ADDRESS], Springfield, IL [ZIP]");
    }

    #[test]
    fn keeps_the_year_of_month_year_dates() {
        let out = scrub("Colonoscopy completed August 2023, next due 2033.");
        assert_eq!(out, "Colonoscopy completed [DATE] 2023, next due 2033.");
    }

    #[test]
    fn leaves_clinical_values_alone() {
        let text = "BP 138/86, HbA1c 7.4%, LDL 112 mg/dL";
        assert_eq!(scrub(text), text);
    }
}
