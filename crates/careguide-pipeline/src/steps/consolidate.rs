use careguide_bedrock::client::ModelClient;
use careguide_bedrock::error::BedrockError;
use careguide_bedrock::transaction::{CallPolicy, StructuredCall, invoke_structured};
use careguide_core::models::recommendation::{Recommendation, RecommendationList};
use careguide_core::models::transaction::TransactionType;
use careguide_core::schema;
use tracing::info;

use super::StepOutput;
use crate::prompts;

/// Drop exact duplicates, merge semantic duplicates with the model, and
/// issue fresh ids. The result is never longer than `candidates`.
pub async fn consolidate<M>(
    model: &M,
    candidates: Vec<Recommendation>,
    policy: &CallPolicy,
) -> Result<StepOutput<Vec<Recommendation>>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let input_count = candidates.len();
    let unique = dedup_exact(candidates);

    let mut step = if unique.len() <= 1 {
        StepOutput::local(unique)
    } else {
        merge_semantic(model, unique, policy).await?
    };

    for rec in &mut step.output {
        rec.normalize_grade();
    }
    reissue_ids(&mut step.output);

    info!(input = input_count, output = step.output.len(), "recommendations consolidated");
    Ok(step)
}

async fn merge_semantic<M>(
    model: &M,
    unique: Vec<Recommendation>,
    policy: &CallPolicy,
) -> Result<StepOutput<Vec<Recommendation>>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let limit = unique.len();
    let candidates_json = serde_json::to_string_pretty(&RecommendationList {
        recommendations: unique,
    })?;

    let schema = schema::recommendation_list();
    let call = StructuredCall {
        transaction_type: TransactionType::Consolidation,
        system_prompt: prompts::CONSOLIDATION,
        user_message: format!(
            "Consolidate these {limit} recommendations into a unique, deduplicated list:\n\n{candidates_json}"
        ),
        schema: &schema,
    };

    let result = invoke_structured(model, call, policy, |out: &RecommendationList| {
        let count = out.recommendations.len();
        if count == 0 {
            Err("the consolidated list is empty".to_string())
        } else if count > limit {
            Err(format!(
                "the consolidated list has {count} recommendations but the input had only {limit}"
            ))
        } else {
            Ok(())
        }
    })
    .await?;

    Ok(StepOutput {
        transactions: vec![result.transaction()],
        output: result.output.recommendations,
    })
}

/// Remove candidates whose normalized description repeats an earlier one.
/// The first position is kept; a graded duplicate replaces an ungraded one.
pub fn dedup_exact(candidates: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut kept: Vec<(String, Recommendation)> = Vec::with_capacity(candidates.len());
    for rec in candidates {
        let key = rec.dedup_key();
        match kept.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                if existing.evidence_grade.is_none() && rec.evidence_grade.is_some() {
                    *existing = rec;
                }
            }
            None => kept.push((key, rec)),
        }
    }
    kept.into_iter().map(|(_, rec)| rec).collect()
}

/// Number recommendations `rec-1`, `rec-2`, ... in list order.
pub fn reissue_ids(recommendations: &mut [Recommendation]) {
    for (idx, rec) in recommendations.iter_mut().enumerate() {
        rec.id = format!("rec-{}", idx + 1);
    }
}
