//! Per-recommendation assessment against the de-identified record, with an
//! optional reviewer pass over each draft.

use careguide_bedrock::client::ModelClient;
use careguide_bedrock::error::BedrockError;
use careguide_bedrock::transaction::{CallPolicy, StructuredCall, invoke_structured};
use careguide_core::models::assessment::{ActivityStatus, Assessment, AssessmentDraft};
use careguide_core::models::record::PatientRecord;
use careguide_core::models::recommendation::Recommendation;
use careguide_core::models::transaction::{ModelTransaction, TransactionStatus, TransactionType};
use careguide_core::schema;
use tracing::{info, warn};
use uuid::Uuid;

use super::StepOutput;
use crate::prompts;

/// Assess every recommendation in order. The output has exactly one
/// assessment per recommendation, aligned by index.
pub async fn assess_all<M>(
    model: &M,
    recommendations: &[Recommendation],
    record: &PatientRecord,
    policy: &CallPolicy,
    review: bool,
) -> Result<StepOutput<Vec<Assessment>>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let mut assessed = StepOutput::local(Vec::with_capacity(recommendations.len()));
    for recommendation in recommendations {
        let step = assess_one(model, recommendation, record, policy, review).await?;
        assessed.output.push(step.output);
        assessed.transactions.extend(step.transactions);
    }
    Ok(assessed)
}

pub async fn assess_one<M>(
    model: &M,
    recommendation: &Recommendation,
    record: &PatientRecord,
    policy: &CallPolicy,
    review: bool,
) -> Result<StepOutput<Assessment>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let schema = schema::assessment_draft();
    let activity = activity_block(recommendation);

    let draft = invoke_structured(
        model,
        StructuredCall {
            transaction_type: TransactionType::Assessment,
            system_prompt: prompts::ASSESSMENT,
            user_message: format!(
                "{activity}\n\nPatient Health Record:\n{}\n\nDetermine the status and urgency of this activity.",
                record.deidentified_text
            ),
            schema: &schema,
        },
        policy,
        |d: &AssessmentDraft| validate_draft(d, record),
    )
    .await?;

    let mut transactions = vec![draft.transaction()];
    let mut final_draft = draft.output;

    if review {
        let draft_json = serde_json::to_string_pretty(&final_draft)?;
        let reviewed = invoke_structured(
            model,
            StructuredCall {
                transaction_type: TransactionType::AssessmentReview,
                system_prompt: prompts::ASSESSMENT_REVIEW,
                user_message: format!(
                    "{activity}\n\nPatient Health Record:\n{}\n\nDraft Assessment:\n{draft_json}\n\n\
Review the draft against the record and return the final assessment.",
                    record.deidentified_text
                ),
                schema: &schema,
            },
            policy,
            |d: &AssessmentDraft| validate_draft(d, record),
        )
        .await;

        match reviewed {
            Ok(result) => {
                transactions.push(result.transaction());
                final_draft = result.output;
            }
            Err(e) if e.is_validation() => {
                warn!(recommendation = %recommendation.id, error = %e, "assessment review rejected, keeping draft");
                transactions.push(ModelTransaction {
                    id: Uuid::new_v4(),
                    transaction_type: TransactionType::AssessmentReview,
                    model_id: model.model_id().to_string(),
                    attempts: policy.repair_attempts + 1,
                    usage: Default::default(),
                    status: TransactionStatus::Fallback,
                });
            }
            Err(e) => return Err(e),
        }
    }

    let assessment = Assessment::from_draft(recommendation, final_draft);
    info!(
        recommendation = %assessment.recommendation_id,
        status = %assessment.status,
        "activity assessed"
    );

    Ok(StepOutput {
        output: assessment,
        transactions,
    })
}

/// Semantic checks the schema cannot express.
pub fn validate_draft(draft: &AssessmentDraft, record: &PatientRecord) -> Result<(), String> {
    if draft.confidence_score.is_some_and(|s| s > 100) {
        return Err("confidence_score must be between 0 and 100".to_string());
    }
    if draft.status == ActivityStatus::Done {
        let quote = draft.supporting_quote.trim();
        if quote.is_empty() {
            return Err("status \"done\" requires a supporting_quote from the record".to_string());
        }
        if !record.contains_quote(quote) {
            return Err(format!(
                "supporting_quote {quote:?} does not appear verbatim in the record; quote the record exactly or change the status"
            ));
        }
    }
    Ok(())
}

fn activity_block(recommendation: &Recommendation) -> String {
    let mut block = format!("Activity: {}", recommendation.description);
    if !recommendation.frequency.is_empty() {
        block.push_str(&format!("\nFrequency: {}", recommendation.frequency));
    }
    if !recommendation.details.is_empty() {
        block.push_str(&format!("\nDetails: {}", recommendation.details));
    }
    block.push_str(&format!("\nCategory: {}", recommendation.category.as_str()));
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PatientRecord {
        PatientRecord::new(
            vec!["notes.txt".to_string()],
            String::new(),
            "Patient had colonoscopy completed August 2023, no polyps found.".to_string(),
        )
    }

    fn draft(status: ActivityStatus, quote: &str) -> AssessmentDraft {
        AssessmentDraft {
            status,
            supporting_quote: quote.to_string(),
            confidence_note: String::new(),
            confidence_score: Some(90),
            urgency: Default::default(),
            completion_date: None,
            questions: vec![],
        }
    }

    #[test]
    fn done_needs_verbatim_quote() {
        let record = record();
        assert!(validate_draft(&draft(ActivityStatus::Done, "colonoscopy completed August 2023"), &record).is_ok());
        assert!(validate_draft(&draft(ActivityStatus::Done, ""), &record).is_err());
        assert!(validate_draft(&draft(ActivityStatus::Done, "colonoscopy done in 2023"), &record).is_err());
    }

    #[test]
    fn not_done_and_unclear_need_no_quote() {
        let record = record();
        assert!(validate_draft(&draft(ActivityStatus::NotDone, ""), &record).is_ok());
        assert!(validate_draft(&draft(ActivityStatus::Unclear, "invented text"), &record).is_ok());
    }

    #[test]
    fn confidence_is_bounded() {
        let mut d = draft(ActivityStatus::NotDone, "");
        d.confidence_score = Some(101);
        assert!(validate_draft(&d, &record()).is_err());
    }
}
