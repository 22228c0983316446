use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::recommendation::{EvidenceGrade, Recommendation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActivityStatus {
    Done,
    NotDone,
    Unclear,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 3] = [
        ActivityStatus::Done,
        ActivityStatus::NotDone,
        ActivityStatus::Unclear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Done => "done",
            ActivityStatus::NotDone => "not_done",
            ActivityStatus::Unclear => "unclear",
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Medical urgency of an activity for this patient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::High, Urgency::Medium, Urgency::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }
}

/// Raw assessment as returned by the model, before it is bound to a
/// recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentDraft {
    pub status: ActivityStatus,
    #[serde(default)]
    pub supporting_quote: String,
    #[serde(default)]
    pub confidence_note: String,
    #[serde(default)]
    pub confidence_score: Option<u32>,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// The assessed status of one consolidated recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub recommendation_id: String,
    pub description: String,
    pub evidence_grade: Option<EvidenceGrade>,
    pub status: ActivityStatus,
    pub supporting_quote: String,
    pub confidence_note: String,
    pub confidence_score: Option<u32>,
    pub urgency: Urgency,
    pub completion_date: Option<String>,
    pub questions: Vec<String>,
}

impl Assessment {
    /// Bind a draft to the recommendation it assesses. Identity fields come
    /// from the recommendation; whatever the model echoed is ignored.
    pub fn from_draft(recommendation: &Recommendation, draft: AssessmentDraft) -> Self {
        let mut questions: Vec<String> = draft
            .questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();

        if draft.status == ActivityStatus::Unclear && questions.is_empty() {
            questions.push(format!(
                "Have you completed \"{}\"? If so, when?",
                recommendation.description
            ));
        }

        Self {
            recommendation_id: recommendation.id.clone(),
            description: recommendation.description.clone(),
            evidence_grade: recommendation.evidence_grade,
            status: draft.status,
            supporting_quote: draft.supporting_quote.trim().to_string(),
            confidence_note: draft.confidence_note,
            confidence_score: draft.confidence_score,
            urgency: draft.urgency,
            completion_date: draft.completion_date.filter(|d| !d.trim().is_empty()),
            questions,
        }
    }

    /// Back to the wire form, for handing a first draft to the reviewer.
    pub fn to_draft(&self) -> AssessmentDraft {
        AssessmentDraft {
            status: self.status,
            supporting_quote: self.supporting_quote.clone(),
            confidence_note: self.confidence_note.clone(),
            confidence_score: self.confidence_score,
            urgency: self.urgency,
            completion_date: self.completion_date.clone(),
            questions: self.questions.clone(),
        }
    }
}
