use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::assessment::{ActivityStatus, Assessment};
use super::recommendation::Recommendation;
use super::summary::Summary;
use super::transaction::ModelTransaction;
use crate::error::CoreError;
use crate::scoring::EngagementScore;

/// A question for the user about an activity the record could not settle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClarifyingQuestion {
    pub recommendation_id: String,
    pub question: String,
}

/// The single output document of an assessment run.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthReport {
    pub id: Uuid,
    pub generated_at: jiff::Timestamp,
    pub model_id: String,
    pub sources: Vec<String>,
    pub summary: Summary,
    pub recommendations: Vec<Recommendation>,
    pub assessments: Vec<Assessment>,
    pub score: EngagementScore,
    pub clarifying_questions: Vec<ClarifyingQuestion>,
    pub transactions: Vec<ModelTransaction>,
    pub total_cost_usd: f64,
}

impl HealthReport {
    pub fn assessments_with_status(&self, status: ActivityStatus) -> impl Iterator<Item = &Assessment> {
        self.assessments.iter().filter(move |a| a.status == status)
    }

    pub fn assessment(&self, recommendation_id: &str) -> Option<&Assessment> {
        self.assessments
            .iter()
            .find(|a| a.recommendation_id == recommendation_id)
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}
