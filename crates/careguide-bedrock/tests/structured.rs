//! Repair-retry, timeout, and failure behavior of the structured-call
//! wrapper, driven by scripted models.

use std::time::Duration;

use careguide_bedrock::client::{ModelClient, ModelReply, ModelRequest};
use careguide_bedrock::error::BedrockError;
use careguide_bedrock::replay::ReplayClient;
use careguide_bedrock::chat::{ChatMessage, ChatRole};
use careguide_bedrock::transaction::{CallPolicy, StructuredCall, invoke_structured, invoke_text};
use careguide_core::models::transaction::{TransactionStatus, TransactionType};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct Count {
    count: u32,
}

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "required": ["count"],
        "properties": { "count": { "type": "integer", "minimum": 0 } }
    })
}

fn call(schema: &serde_json::Value) -> StructuredCall<'_> {
    StructuredCall {
        transaction_type: TransactionType::Consolidation,
        system_prompt: "Count things.",
        user_message: "How many?".to_string(),
        schema,
    }
}

#[tokio::test]
async fn valid_reply_needs_one_call() {
    let model = ReplayClient::new().on(TransactionType::Consolidation, r#"{"count": 3}"#);
    let schema = schema();

    let result = invoke_structured::<_, Count, _>(&model, call(&schema), &CallPolicy::default(), |_| Ok(()))
        .await
        .unwrap();

    assert_eq!(result.output.count, 3);
    assert_eq!(result.attempts, 1);
    assert_eq!(result.status, TransactionStatus::Complete);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn invalid_reply_is_repaired_once() {
    let model = ReplayClient::new()
        .on(TransactionType::Consolidation, "not json at all")
        .on(TransactionType::Consolidation, "```json\n{\"count\": 2}\n```");
    let schema = schema();

    let result = invoke_structured::<_, Count, _>(&model, call(&schema), &CallPolicy::default(), |_| Ok(()))
        .await
        .unwrap();

    assert_eq!(result.output.count, 2);
    assert_eq!(result.attempts, 2);

    // The repair request carries the bad reply and the error.
    let requests = model.requests();
    let repair = &requests[1].messages;
    assert_eq!(repair.len(), 3);
    assert_eq!(repair[1].role, ChatRole::Assistant);
    assert_eq!(repair[1].content, "not json at all");
    assert!(repair[2].content.contains("rejected"));
}

#[tokio::test]
async fn semantic_rejection_counts_as_invalid() {
    let model = ReplayClient::new()
        .on(TransactionType::Consolidation, r#"{"count": 9}"#)
        .on(TransactionType::Consolidation, r#"{"count": 1}"#);
    let schema = schema();

    let result = invoke_structured::<_, Count, _>(&model, call(&schema), &CallPolicy::default(), |c: &Count| {
        if c.count > 5 {
            Err(format!("count {} exceeds 5", c.count))
        } else {
            Ok(())
        }
    })
    .await
    .unwrap();

    assert_eq!(result.output.count, 1);
    assert!(model.requests()[1].messages[2].content.contains("count 9 exceeds 5"));
}

#[tokio::test]
async fn persistent_violation_fails_after_one_repair() {
    let model = ReplayClient::new().on(TransactionType::Consolidation, r#"{"count": -1}"#);
    let schema = schema();

    let err = invoke_structured::<_, Count, _>(&model, call(&schema), &CallPolicy::default(), |_| Ok(()))
        .await
        .unwrap_err();

    assert!(matches!(err, BedrockError::SchemaViolation(_)));
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn zero_repair_attempts_fails_immediately() {
    let model = ReplayClient::new().on(TransactionType::Consolidation, "nope");
    let schema = schema();
    let policy = CallPolicy {
        repair_attempts: 0,
        ..CallPolicy::default()
    };

    let err = invoke_structured::<_, Count, _>(&model, call(&schema), &policy, |_| Ok(()))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn invocation_errors_are_not_retried() {
    let model = ReplayClient::new().fail(TransactionType::Consolidation, "AccessDeniedException");
    let schema = schema();

    let err = invoke_structured::<_, Count, _>(&model, call(&schema), &CallPolicy::default(), |_| Ok(()))
        .await
        .unwrap_err();

    assert!(matches!(err, BedrockError::Invocation(ref m) if m.contains("AccessDenied")));
    assert_eq!(model.calls(), 1);
}

struct SlowModel;

impl ModelClient for SlowModel {
    fn model_id(&self) -> &str {
        "slow"
    }

    async fn converse(&self, _request: &ModelRequest) -> Result<ModelReply, BedrockError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(BedrockError::Invocation("unreachable".to_string()))
    }
}

#[tokio::test]
async fn slow_model_times_out() {
    let schema = schema();
    let policy = CallPolicy {
        timeout: Duration::from_millis(50),
        repair_attempts: 1,
    };

    let err = invoke_structured::<_, Count, _>(&SlowModel, call(&schema), &policy, |_| Ok(()))
        .await
        .unwrap_err();

    assert!(matches!(err, BedrockError::Timeout { timeout } if timeout == Duration::from_millis(50)));
    assert!(!err.is_validation());
    assert_eq!(err.to_string(), "model call timed out after 50ms");
}

#[tokio::test]
async fn text_call_rejects_empty_reply() {
    let model = ReplayClient::new().on(TransactionType::ReportChat, "   ");

    let err = invoke_text(
        &model,
        TransactionType::ReportChat,
        "Answer questions.",
        vec![ChatMessage::user("Why a flu shot?")],
        &CallPolicy::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, BedrockError::ResponseParse(_)));
}

#[tokio::test]
async fn needle_routes_take_precedence() {
    let model = ReplayClient::new()
        .on(TransactionType::Assessment, r#"{"count": 0}"#)
        .on_matching(TransactionType::Assessment, "colonoscopy", r#"{"count": 7}"#);
    let schema = schema();

    let specific = StructuredCall {
        transaction_type: TransactionType::Assessment,
        system_prompt: "Assess.",
        user_message: "Activity: colonoscopy".to_string(),
        schema: &schema,
    };
    let generic = StructuredCall {
        transaction_type: TransactionType::Assessment,
        system_prompt: "Assess.",
        user_message: "Activity: flu shot".to_string(),
        schema: &schema,
    };

    let policy = CallPolicy::default();
    let a = invoke_structured::<_, Count, _>(&model, specific, &policy, |_| Ok(())).await.unwrap();
    let b = invoke_structured::<_, Count, _>(&model, generic, &policy, |_| Ok(())).await.unwrap();
    assert_eq!(a.output.count, 7);
    assert_eq!(b.output.count, 0);
}
