//! Follow-up agents that work from a finished report: free-form chat about
//! the report, and what-if re-scoring with a model explanation.

use careguide_bedrock::chat::ChatMessage;
use careguide_bedrock::client::ModelClient;
use careguide_bedrock::transaction::{CallPolicy, TransactionResult, invoke_text};
use careguide_core::error::CoreError;
use careguide_core::models::assessment::Assessment;
use careguide_core::models::recommendation::Recommendation;
use careguide_core::models::report::{ClarifyingQuestion, HealthReport};
use careguide_core::models::summary::Summary;
use careguide_core::models::transaction::TransactionType;
use careguide_core::scoring::{EngagementScore, ScoringWeights, simulate_completion};
use serde::Serialize;
use tracing::info;

use crate::error::StepError;
use crate::prompts;

/// The score before and after marking one activity as done.
#[derive(Debug, Clone, Serialize)]
pub struct WhatIf {
    pub recommendation_id: String,
    pub description: String,
    pub current: EngagementScore,
    pub simulated: EngagementScore,
}

impl WhatIf {
    /// Score points gained by completing the activity.
    pub fn gain(&self) -> i16 {
        i16::from(self.simulated.score) - i16::from(self.current.score)
    }
}

/// Re-score `report` as if `recommendation_id` were done. No model call.
///
/// `current` is the score saved in the report; `simulated` uses `weights`.
pub fn what_if(
    report: &HealthReport,
    recommendation_id: &str,
    weights: &ScoringWeights,
) -> Result<WhatIf, StepError> {
    weights.validate()?;
    let assessment = report
        .assessment(recommendation_id)
        .ok_or_else(|| CoreError::UnknownRecommendation(recommendation_id.to_string()))?;

    Ok(WhatIf {
        recommendation_id: assessment.recommendation_id.clone(),
        description: assessment.description.clone(),
        current: report.score,
        simulated: simulate_completion(&report.assessments, recommendation_id, weights)?,
    })
}

/// Answer a question using only the report as context.
pub async fn chat<M>(
    model: &M,
    report: &HealthReport,
    question: &str,
    policy: &CallPolicy,
) -> Result<TransactionResult<String>, StepError>
where
    M: ModelClient + ?Sized,
{
    let question = question.trim();
    if question.is_empty() {
        return Err(StepError::Data("question is empty".to_string()));
    }

    let message = format!(
        "Patient Summary:\n{}\n\nHealth Report (JSON):\n{}\n\nUser's Question:\n{question}\n\n\
Answer the question based only on the information above.",
        report.summary.advanced_summary,
        report_context(report)?,
    );

    let answer = invoke_text(
        model,
        TransactionType::ReportChat,
        prompts::REPORT_CHAT,
        vec![ChatMessage::user(message)],
        policy,
    )
    .await?;
    info!(report_id = %report.id, "answered report question");
    Ok(answer)
}

/// Explain the medical and score reasons behind a what-if result.
pub async fn explain_what_if<M>(
    model: &M,
    report: &HealthReport,
    scenario: &WhatIf,
    policy: &CallPolicy,
) -> Result<TransactionResult<String>, StepError>
where
    M: ModelClient + ?Sized,
{
    let message = format!(
        "Patient Summary:\n{}\n\nHealth Report (JSON):\n{}\n\nSelected Activity to Simulate:\n{}\n\n\
Score Change:\n- Current Score: {}\n- Simulated New Score: {}\n\n\
Provide your analysis, starting with the medical reason for this activity's importance.",
        report.summary.advanced_summary,
        report_context(report)?,
        scenario.description,
        scenario.current.score,
        scenario.simulated.score,
    );

    Ok(invoke_text(
        model,
        TransactionType::WhatIfAnalysis,
        prompts::WHAT_IF,
        vec![ChatMessage::user(message)],
        policy,
    )
    .await?)
}

/// The parts of a report the follow-up agents may see. Transactions and
/// cost are left out.
fn report_context(report: &HealthReport) -> Result<String, StepError> {
    #[derive(Serialize)]
    struct ReportContext<'a> {
        summary: &'a Summary,
        recommendations: &'a [Recommendation],
        assessments: &'a [Assessment],
        score: &'a EngagementScore,
        clarifying_questions: &'a [ClarifyingQuestion],
    }

    let context = ReportContext {
        summary: &report.summary,
        recommendations: &report.recommendations,
        assessments: &report.assessments,
        score: &report.score,
        clarifying_questions: &report.clarifying_questions,
    };
    Ok(serde_json::to_string_pretty(&context).map_err(CoreError::from)?)
}
