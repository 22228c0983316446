use careguide_bedrock::client::ModelClient;
use careguide_bedrock::error::BedrockError;
use careguide_bedrock::transaction::{CallPolicy, StructuredCall, invoke_structured};
use careguide_core::models::summary::{AdvancedSummary, BasicSummary, Summary};
use careguide_core::models::transaction::TransactionType;
use careguide_core::schema;
use tracing::info;

use super::StepOutput;
use crate::prompts;

/// Only the head of the record is sent to the summarizers.
pub const SUMMARY_INPUT_CHARS: usize = 3000;

/// Run the basic and advanced summarizers and merge their output.
pub async fn summarize<M>(
    model: &M,
    deidentified_text: &str,
    policy: &CallPolicy,
) -> Result<StepOutput<Summary>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let excerpt = truncate_chars(deidentified_text, SUMMARY_INPUT_CHARS);
    let user_message = format!(
        "Analyze this patient health record:\n\n{excerpt}\n\nIf the record is incomplete, leave unknown fields null or empty."
    );

    let basic_schema = schema::basic_summary();
    let basic = invoke_structured::<_, BasicSummary, _>(
        model,
        StructuredCall {
            transaction_type: TransactionType::BasicSummary,
            system_prompt: prompts::BASIC_SUMMARY,
            user_message: user_message.clone(),
            schema: &basic_schema,
        },
        policy,
        |_| Ok(()),
    )
    .await?;

    let advanced_schema = schema::advanced_summary();
    let advanced = invoke_structured::<_, AdvancedSummary, _>(
        model,
        StructuredCall {
            transaction_type: TransactionType::AdvancedSummary,
            system_prompt: prompts::ADVANCED_SUMMARY,
            user_message,
            schema: &advanced_schema,
        },
        policy,
        |_| Ok(()),
    )
    .await?;

    let transactions = vec![basic.transaction(), advanced.transaction()];
    let summary = Summary::merge(basic.output, advanced.output);
    info!(
        age_band = summary.age_band.as_deref().unwrap_or("unknown"),
        conditions = summary.conditions.len(),
        "patient summarized"
    );

    Ok(StepOutput {
        output: summary,
        transactions,
    })
}

/// The first `max` characters of `text`, cut on a character boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_character_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
