use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Strength-of-evidence letter grade (USPSTF convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EvidenceGrade {
    A,
    B,
    C,
    D,
}

impl EvidenceGrade {
    pub const ALL: [EvidenceGrade; 4] = [
        EvidenceGrade::A,
        EvidenceGrade::B,
        EvidenceGrade::C,
        EvidenceGrade::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceGrade::A => "A",
            EvidenceGrade::B => "B",
            EvidenceGrade::C => "C",
            EvidenceGrade::D => "D",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(EvidenceGrade::A),
            "B" => Some(EvidenceGrade::B),
            "C" => Some(EvidenceGrade::C),
            "D" => Some(EvidenceGrade::D),
            _ => None,
        }
    }

    /// Recover a grade cited in free text such as `"USPSTF Grade B"`.
    pub fn from_citation(text: &str) -> Option<Self> {
        let lower = text.to_ascii_lowercase();
        let idx = lower.find("grade")?;
        let rest = text[idx + "grade".len()..].trim_start_matches([' ', ':', '-']);
        let mut chars = rest.chars();
        let letter = chars.next()?;
        // "Grade Bx" is not a grade citation.
        if chars.next().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Self::parse(&letter.to_string())
    }
}

impl std::fmt::Display for EvidenceGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    #[serde(rename = "Preventive Screening")]
    PreventiveScreening,
    #[serde(rename = "Vaccination")]
    Vaccination,
    #[serde(rename = "Lifestyle & Wellness")]
    LifestyleWellness,
    #[serde(rename = "Chronic Disease Management")]
    ChronicDiseaseManagement,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::PreventiveScreening,
        Category::Vaccination,
        Category::LifestyleWellness,
        Category::ChronicDiseaseManagement,
        Category::MentalHealth,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PreventiveScreening => "Preventive Screening",
            Category::Vaccination => "Vaccination",
            Category::LifestyleWellness => "Lifestyle & Wellness",
            Category::ChronicDiseaseManagement => "Chronic Disease Management",
            Category::MentalHealth => "Mental Health",
            Category::Other => "Other",
        }
    }
}

/// A candidate or consolidated preventive-care recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Recommendation {
    #[serde(default)]
    pub id: String,
    /// Short title, at most 150 characters.
    pub description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub frequency: String,
    pub category: Category,
    pub source: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub evidence_grade: Option<EvidenceGrade>,
}

impl Recommendation {
    /// Fill in a missing grade from the source citation.
    pub fn normalize_grade(&mut self) {
        if self.evidence_grade.is_none() {
            self.evidence_grade = EvidenceGrade::from_citation(&self.source);
        }
    }

    /// Case- and whitespace-insensitive form of the description, used to
    /// drop exact duplicates before semantic consolidation.
    pub fn dedup_key(&self) -> String {
        self.description
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Wrapper object returned by every recommendation-producing model call.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecommendationList {
    pub recommendations: Vec<Recommendation>,
}
