use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::token_count::TokenUsage;

/// A model transaction: one auditable call site in a pipeline run.
///
/// Repair retries are folded into the same transaction; `attempts` counts
/// every request sent.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelTransaction {
    pub id: Uuid,
    pub transaction_type: TransactionType,
    pub model_id: String,
    pub attempts: u32,
    pub usage: TokenUsage,
    pub status: TransactionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionType {
    Deidentification,
    BasicSummary,
    AdvancedSummary,
    GeneralRecommendations,
    ConditionRecommendations,
    GuidelineRecommendations,
    Consolidation,
    Assessment,
    AssessmentReview,
    ReportChat,
    WhatIfAnalysis,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deidentification => "deidentification",
            TransactionType::BasicSummary => "basic_summary",
            TransactionType::AdvancedSummary => "advanced_summary",
            TransactionType::GeneralRecommendations => "general_recommendations",
            TransactionType::ConditionRecommendations => "condition_recommendations",
            TransactionType::GuidelineRecommendations => "guideline_recommendations",
            TransactionType::Consolidation => "consolidation",
            TransactionType::Assessment => "assessment",
            TransactionType::AssessmentReview => "assessment_review",
            TransactionType::ReportChat => "report_chat",
            TransactionType::WhatIfAnalysis => "what_if_analysis",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionStatus {
    Complete,
    /// The draft was kept because a follow-up review call failed.
    Fallback,
}
