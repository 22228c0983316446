//! The three recommendation sources. Each yields an ordered list of
//! candidates; duplicates across sources are left for consolidation.

use careguide_bedrock::client::ModelClient;
use careguide_bedrock::error::BedrockError;
use careguide_bedrock::transaction::{CallPolicy, StructuredCall, invoke_structured};
use careguide_core::models::recommendation::{Recommendation, RecommendationList};
use careguide_core::models::summary::Summary;
use careguide_core::models::transaction::TransactionType;
use careguide_core::schema;
use careguide_guidelines::catalog::to_prompt_text;
use careguide_guidelines::{GuidelineTable, select};
use tracing::{debug, info};

use super::StepOutput;
use crate::prompts;

/// Run all three sources and concatenate their candidates in source order:
/// general, condition-specific, guideline.
pub async fn gather<M>(
    model: &M,
    summary: &Summary,
    guidelines: &GuidelineTable,
    policy: &CallPolicy,
    parallel: bool,
) -> Result<StepOutput<Vec<Recommendation>>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let (general, condition, guideline) = if parallel {
        tokio::join!(
            general_source(model, summary, policy),
            condition_source(model, summary, policy),
            guideline_source(model, summary, guidelines, policy),
        )
    } else {
        (
            general_source(model, summary, policy).await,
            condition_source(model, summary, policy).await,
            guideline_source(model, summary, guidelines, policy).await,
        )
    };

    let mut gathered = StepOutput::local(Vec::new());
    for source in [general?, condition?, guideline?] {
        gathered.output.extend(source.output);
        gathered.transactions.extend(source.transactions);
    }

    info!(count = gathered.output.len(), parallel, "recommendation candidates gathered");
    Ok(gathered)
}

/// Recommendations from general preventive-care knowledge, driven by the
/// patient's demographics.
pub async fn general_source<M>(
    model: &M,
    summary: &Summary,
    policy: &CallPolicy,
) -> Result<StepOutput<Vec<Recommendation>>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let system = prompts::general_recommendations();
    let user_message = format!(
        "Generate general health recommendations for this patient:\n\nPatient: {}\n\n\
Provide 5-10 evidence-based recommendations appropriate for this patient's profile. \
Focus on actionable, specific health activities.",
        summary.basic_summary
    );
    request_list(model, TransactionType::GeneralRecommendations, &system, user_message, policy).await
}

/// Recommendations driven by the patient's conditions and risk factors.
pub async fn condition_source<M>(
    model: &M,
    summary: &Summary,
    policy: &CallPolicy,
) -> Result<StepOutput<Vec<Recommendation>>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let system = prompts::condition_recommendations();
    let user_message = format!(
        "Generate condition-specific health recommendations for this patient:\n\n\
Patient: {}\nConditions: {}\nMedications: {}\nRisk factors: {}\n\n\
Provide 5-10 evidence-based recommendations appropriate for this patient's conditions.",
        summary.advanced_summary,
        list_or_none(&summary.conditions),
        list_or_none(&summary.medications),
        list_or_none(&summary.risk_factors),
    );
    request_list(model, TransactionType::ConditionRecommendations, &system, user_message, policy).await
}

/// Recommendations grounded in the guideline rows that match this patient.
/// An empty table yields nothing without calling the model.
pub async fn guideline_source<M>(
    model: &M,
    summary: &Summary,
    guidelines: &GuidelineTable,
    policy: &CallPolicy,
) -> Result<StepOutput<Vec<Recommendation>>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let selected = select(guidelines, summary);
    if selected.is_empty() {
        debug!("guideline table is empty, skipping guideline source");
        return Ok(StepOutput::local(Vec::new()));
    }

    let system = prompts::guideline_recommendations();
    let user_message = format!(
        "Patient: {}\n{}\n\nUSPSTF Guidelines:\n\n{}\n\n\
Generate health activity recommendations based on the applicable guidelines.",
        summary.basic_summary,
        summary.advanced_summary,
        to_prompt_text(&selected),
    );
    request_list(model, TransactionType::GuidelineRecommendations, &system, user_message, policy).await
}

async fn request_list<M>(
    model: &M,
    transaction_type: TransactionType,
    system_prompt: &str,
    user_message: String,
    policy: &CallPolicy,
) -> Result<StepOutput<Vec<Recommendation>>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let schema = schema::recommendation_list();
    let call = StructuredCall {
        transaction_type,
        system_prompt,
        user_message,
        schema: &schema,
    };
    let result = invoke_structured(model, call, policy, |_: &RecommendationList| Ok(())).await?;

    let transactions = vec![result.transaction()];
    let mut recommendations = result.output.recommendations;
    for rec in &mut recommendations {
        rec.normalize_grade();
    }
    debug!(step = %transaction_type, count = recommendations.len(), "source returned candidates");

    Ok(StepOutput {
        output: recommendations,
        transactions,
    })
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none recorded".to_string()
    } else {
        items.join(", ")
    }
}
