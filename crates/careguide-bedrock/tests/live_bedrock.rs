//! Integration tests against the real Bedrock Converse API.
//!
//! These tests require valid credentials in the environment (e.g.
//! `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`) and model access for
//! `CAREGUIDE_MODEL_ID`.
//!
//! Run with: `cargo test -p careguide-bedrock --test live_bedrock -- --ignored`

use careguide_bedrock::chat::ChatMessage;
use careguide_bedrock::client::{BedrockModel, InferenceSettings, build_sdk_config};
use careguide_bedrock::transaction::{CallPolicy, StructuredCall, invoke_structured, invoke_text};
use careguide_core::models::summary::BasicSummary;
use careguide_core::models::transaction::TransactionType;
use careguide_core::schema;

async fn build_model() -> BedrockModel {
    let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
    let model_id = std::env::var("CAREGUIDE_MODEL_ID")
        .unwrap_or_else(|_| "us.anthropic.claude-sonnet-4-20250514-v1:0".to_string());
    let config = build_sdk_config(&region, None).await;
    BedrockModel::new(&config, model_id, InferenceSettings::default())
}

#[tokio::test]
#[ignore]
async fn live_text_reply_is_non_empty() {
    let model = build_model().await;
    let result = invoke_text(
        &model,
        TransactionType::ReportChat,
        "Answer in one short sentence.",
        vec![ChatMessage::user("What does a blood pressure screening measure?")],
        &CallPolicy::default(),
    )
    .await
    .expect("converse should succeed");

    assert!(!result.output.is_empty());
    assert!(result.usage.tokens.total() > 0);
}

#[tokio::test]
#[ignore]
async fn live_structured_summary_parses() {
    let model = build_model().await;
    let schema = schema::basic_summary();
    let call = StructuredCall {
        transaction_type: TransactionType::BasicSummary,
        system_prompt: "Extract the patient's age, sex, and a one-line demographic summary.",
        user_message: "62 y/o female, retired teacher, seen for routine physical.".to_string(),
        schema: &schema,
    };

    let result = invoke_structured::<_, BasicSummary, _>(&model, call, &CallPolicy::default(), |_| Ok(()))
        .await
        .expect("structured call should succeed");

    assert_eq!(result.output.age, Some(62));
}
