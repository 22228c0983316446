use careguide_bedrock::client::ModelClient;
use careguide_bedrock::error::BedrockError;
use careguide_bedrock::transaction::{CallPolicy, StructuredCall, invoke_structured};
use careguide_core::models::transaction::TransactionType;
use careguide_core::schema;
use serde::Deserialize;

use super::StepOutput;
use crate::config::DeidMode;
use crate::prompts;
use crate::scrub;

#[derive(Debug, Deserialize)]
struct DeidentifiedText {
    deidentified_text: String,
}

/// Remove direct identifiers from `raw_text` using the configured mode.
pub async fn deidentify<M>(
    model: &M,
    raw_text: &str,
    mode: DeidMode,
    policy: &CallPolicy,
) -> Result<StepOutput<String>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    if mode == DeidMode::Local {
        return Ok(StepOutput::local(scrub::scrub(raw_text)));
    }

    let schema = schema::deidentified_text();
    let call = StructuredCall {
        transaction_type: TransactionType::Deidentification,
        system_prompt: prompts::DEIDENTIFY,
        user_message: format!("De-identify this patient health record:\n\n{raw_text}"),
        schema: &schema,
    };

    let result = invoke_structured(model, call, policy, |out: &DeidentifiedText| {
        if out.deidentified_text.trim().is_empty() {
            Err("deidentified_text is empty".to_string())
        } else {
            Ok(())
        }
    })
    .await?;

    Ok(StepOutput {
        transactions: vec![result.transaction()],
        output: result.output.deidentified_text,
    })
}
