use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Demographics-only extraction returned by the basic summarization step.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BasicSummary {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub sex: Option<String>,
    pub basic_summary: String,
}

/// Demographics plus clinical context returned by the advanced step.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdvancedSummary {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub sex: Option<String>,
    pub advanced_summary: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub known_activities: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

/// Merged patient summary for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Summary {
    pub age: Option<u32>,
    pub age_band: Option<String>,
    pub sex: Option<String>,
    pub basic_summary: String,
    pub advanced_summary: String,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub known_activities: Vec<String>,
    pub risk_factors: Vec<String>,
}

impl Summary {
    /// Merge both variants; the advanced extraction wins wherever both
    /// report a value.
    pub fn merge(basic: BasicSummary, advanced: AdvancedSummary) -> Self {
        let age = advanced.age.or(basic.age);
        let sex = non_blank(advanced.sex).or_else(|| non_blank(basic.sex));
        Self {
            age,
            age_band: age.map(|a| age_band(a).to_string()),
            sex,
            basic_summary: basic.basic_summary,
            advanced_summary: advanced.advanced_summary,
            conditions: advanced.conditions,
            medications: advanced.medications,
            known_activities: advanced.known_activities,
            risk_factors: advanced.risk_factors,
        }
    }

    /// Lowercased condition and risk-factor terms, used for guideline matching.
    pub fn clinical_terms(&self) -> Vec<String> {
        self.conditions
            .iter()
            .chain(&self.risk_factors)
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Coarse age band used in reports instead of the exact age.
pub fn age_band(age: u32) -> &'static str {
    match age {
        0..=17 => "<18",
        18..=39 => "18-39",
        40..=49 => "40-49",
        50..=64 => "50-64",
        _ => "65+",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> BasicSummary {
        BasicSummary {
            age: Some(44),
            sex: Some("male".to_string()),
            basic_summary: "44-year-old male".to_string(),
        }
    }

    fn advanced(age: Option<u32>, sex: Option<&str>) -> AdvancedSummary {
        AdvancedSummary {
            age,
            sex: sex.map(str::to_string),
            advanced_summary: "44-year-old male with hypertension".to_string(),
            conditions: vec!["Hypertension".to_string()],
            medications: vec!["Lisinopril 20mg".to_string()],
            known_activities: vec![],
            risk_factors: vec![" Smoking ".to_string()],
        }
    }

    #[test]
    fn advanced_takes_precedence() {
        let merged = Summary::merge(basic(), advanced(Some(45), Some("female")));
        assert_eq!(merged.age, Some(45));
        assert_eq!(merged.sex.as_deref(), Some("female"));
        assert_eq!(merged.age_band.as_deref(), Some("40-49"));
    }

    #[test]
    fn basic_fills_gaps() {
        let merged = Summary::merge(basic(), advanced(None, Some("  ")));
        assert_eq!(merged.age, Some(44));
        assert_eq!(merged.sex.as_deref(), Some("male"));
        assert_eq!(merged.basic_summary, "44-year-old male");
    }

    #[test]
    fn clinical_terms_are_normalized() {
        let merged = Summary::merge(basic(), advanced(None, None));
        assert_eq!(merged.clinical_terms(), vec!["hypertension", "smoking"]);
    }

    #[test]
    fn age_bands() {
        assert_eq!(age_band(12), "<18");
        assert_eq!(age_band(18), "18-39");
        assert_eq!(age_band(64), "50-64");
        assert_eq!(age_band(80), "65+");
    }
}
