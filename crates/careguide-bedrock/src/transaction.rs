use std::time::Duration;

use careguide_core::models::token_count::TokenUsage;
use careguide_core::models::transaction::{ModelTransaction, TransactionStatus, TransactionType};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::ChatMessage;
use crate::client::{ModelClient, ModelReply, ModelRequest};
use crate::error::BedrockError;

/// At most this many schema violations are quoted back to the model.
const MAX_REPORTED_VIOLATIONS: usize = 5;

/// Timeout and repair policy applied to every model call.
#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    pub timeout: Duration,
    /// Re-prompts allowed after an invalid reply.
    pub repair_attempts: u32,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            repair_attempts: 1,
        }
    }
}

/// A structured call site: prompts plus the schema the reply must satisfy.
pub struct StructuredCall<'a> {
    pub transaction_type: TransactionType,
    pub system_prompt: &'a str,
    pub user_message: String,
    pub schema: &'a serde_json::Value,
}

/// The result of a model transaction.
#[derive(Debug, Clone)]
pub struct TransactionResult<T> {
    pub id: Uuid,
    pub transaction_type: TransactionType,
    pub model_id: String,
    pub attempts: u32,
    pub usage: TokenUsage,
    pub status: TransactionStatus,
    pub output: T,
}

impl<T> TransactionResult<T> {
    /// The auditable record of this call, without its output.
    pub fn transaction(&self) -> ModelTransaction {
        ModelTransaction {
            id: self.id,
            transaction_type: self.transaction_type,
            model_id: self.model_id.clone(),
            attempts: self.attempts,
            usage: self.usage,
            status: self.status,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TransactionResult<U> {
        TransactionResult {
            id: self.id,
            transaction_type: self.transaction_type,
            model_id: self.model_id,
            attempts: self.attempts,
            usage: self.usage,
            status: self.status,
            output: f(self.output),
        }
    }
}

/// Call the model and parse its reply into `T`.
///
/// The reply passes through three gates: JSON parsing, structural
/// validation against `call.schema`, and the caller's semantic `validate`.
/// A reply failing any gate is sent back with the error for repair, up to
/// `policy.repair_attempts` times. Invocation failures and timeouts are
/// returned immediately.
pub async fn invoke_structured<M, T, V>(
    model: &M,
    call: StructuredCall<'_>,
    policy: &CallPolicy,
    validate: V,
) -> Result<TransactionResult<T>, BedrockError>
where
    M: ModelClient + ?Sized,
    T: DeserializeOwned,
    V: Fn(&T) -> Result<(), String>,
{
    let transaction_id = Uuid::new_v4();
    let step = call.transaction_type;
    info!(transaction_id = %transaction_id, model = model.model_id(), %step, "starting model transaction");

    let mut request = ModelRequest {
        step,
        system: with_schema_instructions(call.system_prompt, call.schema),
        messages: vec![ChatMessage::user(call.user_message)],
    };
    let mut usage = TokenUsage::default();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let reply = invoke_with_timeout(model, &request, policy).await?;
        usage += reply.usage;

        let parsed = parse_structured::<T>(&reply.text, call.schema).and_then(|output| {
            validate(&output).map_err(BedrockError::SchemaViolation)?;
            Ok(output)
        });

        match parsed {
            Ok(output) => {
                info!(transaction_id = %transaction_id, %step, attempt, "model transaction complete");
                return Ok(TransactionResult {
                    id: transaction_id,
                    transaction_type: step,
                    model_id: model.model_id().to_string(),
                    attempts: attempt,
                    usage,
                    status: TransactionStatus::Complete,
                    output,
                });
            }
            Err(e) if attempt <= policy.repair_attempts => {
                warn!(transaction_id = %transaction_id, %step, attempt, error = %e, "invalid model reply, requesting repair");
                request.messages.push(ChatMessage::assistant(reply.text));
                request.messages.push(ChatMessage::user(repair_prompt(&e)));
            }
            Err(e) => {
                warn!(transaction_id = %transaction_id, %step, attempt, error = %e, "invalid model reply, giving up");
                return Err(e);
            }
        }
    }
}

/// Call the model for a free-text answer (chat and explanations).
pub async fn invoke_text<M>(
    model: &M,
    transaction_type: TransactionType,
    system_prompt: &str,
    messages: Vec<ChatMessage>,
    policy: &CallPolicy,
) -> Result<TransactionResult<String>, BedrockError>
where
    M: ModelClient + ?Sized,
{
    let transaction_id = Uuid::new_v4();
    info!(transaction_id = %transaction_id, model = model.model_id(), step = %transaction_type, "starting model transaction");

    let request = ModelRequest {
        step: transaction_type,
        system: system_prompt.to_string(),
        messages,
    };
    let reply = invoke_with_timeout(model, &request, policy).await?;
    let text = reply.text.trim().to_string();
    if text.is_empty() {
        return Err(BedrockError::ResponseParse("empty response".to_string()));
    }

    Ok(TransactionResult {
        id: transaction_id,
        transaction_type,
        model_id: model.model_id().to_string(),
        attempts: 1,
        usage: reply.usage,
        status: TransactionStatus::Complete,
        output: text,
    })
}

async fn invoke_with_timeout<M>(
    model: &M,
    request: &ModelRequest,
    policy: &CallPolicy,
) -> Result<ModelReply, BedrockError>
where
    M: ModelClient + ?Sized,
{
    tokio::time::timeout(policy.timeout, model.converse(request))
        .await
        .map_err(|_| BedrockError::Timeout {
            timeout: policy.timeout,
        })?
}

/// Parse a raw reply into `T`, checking it against `schema` first.
pub fn parse_structured<T: DeserializeOwned>(
    text: &str,
    schema: &serde_json::Value,
) -> Result<T, BedrockError> {
    let json = extract_json(text);
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| BedrockError::ResponseParse(format!("reply is not valid JSON: {e}")))?;

    let validator = jsonschema::validator_for(schema)
        .map_err(|e| BedrockError::SchemaViolation(format!("invalid JSON Schema document: {e}")))?;

    let violations: Vec<String> = validator
        .iter_errors(&value)
        .take(MAX_REPORTED_VIOLATIONS)
        .map(|error| format!("at '{}': {}", error.instance_path, error))
        .collect();
    if !violations.is_empty() {
        return Err(BedrockError::SchemaViolation(violations.join("; ")));
    }

    serde_json::from_value(value).map_err(|e| BedrockError::SchemaViolation(e.to_string()))
}

/// Strip Markdown code fences and any prose around the outermost JSON object.
pub fn extract_json(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(start) = body.find("```") {
        let after = &body[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        body = match after.find("```") {
            Some(end) => after[..end].trim(),
            None => after.trim(),
        };
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    }
}

fn with_schema_instructions(system_prompt: &str, schema: &serde_json::Value) -> String {
    format!(
        "{system_prompt}\n\nRespond with a single JSON object matching this JSON Schema:\n{schema}\n\nReturn ONLY the JSON, no additional text."
    )
}

fn repair_prompt(error: &BedrockError) -> String {
    format!(
        "Your previous response was rejected: {error}\n\nReturn a corrected JSON object that fixes this problem. Return ONLY the JSON."
    )
}
