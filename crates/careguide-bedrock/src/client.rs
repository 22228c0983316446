//! The hosted-model seam.
//!
//! Pipeline steps talk to a [`ModelClient`]; production wires in
//! [`BedrockModel`] (Converse API), tests wire in the scripted
//! `ReplayClient` from the `test-support` feature.

use std::future::Future;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::types::{ContentBlock, InferenceConfiguration, SystemContentBlock};
use careguide_core::models::token_count::{TokenCount, TokenUsage};
use careguide_core::models::transaction::TransactionType;
use tracing::debug;

use crate::chat::{ChatMessage, to_converse_messages};
use crate::error::BedrockError;
use crate::tokens;

/// One request to the hosted model.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Which pipeline call site issued the request. Not sent to the model.
    pub step: TransactionType,
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

/// The model's reply text and what it cost.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub usage: TokenUsage,
}

/// A text-in/text-out hosted model.
pub trait ModelClient: Send + Sync {
    fn model_id(&self) -> &str;

    fn converse(
        &self,
        request: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, BedrockError>> + Send;
}

/// Sampling parameters sent with every Converse call.
#[derive(Debug, Clone, Copy)]
pub struct InferenceSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: i32,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.95,
            max_tokens: 8192,
        }
    }
}

/// Bedrock Converse-backed model.
#[derive(Debug, Clone)]
pub struct BedrockModel {
    client: Client,
    model_id: String,
    settings: InferenceSettings,
}

impl BedrockModel {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>, settings: InferenceSettings) -> Self {
        Self {
            client: Client::new(config),
            model_id: model_id.into(),
            settings,
        }
    }
}

impl ModelClient for BedrockModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn converse(&self, request: &ModelRequest) -> Result<ModelReply, BedrockError> {
        let messages = to_converse_messages(&request.messages)?;

        let inference = InferenceConfiguration::builder()
            .temperature(self.settings.temperature)
            .top_p(self.settings.top_p)
            .max_tokens(self.settings.max_tokens)
            .build();

        debug!(model = %self.model_id, step = %request.step, turns = messages.len(), "sending converse request");

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(request.system.clone()))
            .set_messages(Some(messages))
            .inference_config(inference)
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(DisplayErrorContext(&e).to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let token_count = response
            .usage()
            .map(tokens::extract_token_usage)
            .unwrap_or(TokenCount { input: 0, output: 0 });

        Ok(ModelReply {
            text,
            usage: tokens::usage_for(&self.model_id, token_count),
        })
    }
}

/// Build an `SdkConfig` for a region, optionally pinned to a named profile.
/// Without a profile the default credential chain applies (environment
/// variables first).
pub async fn build_sdk_config(region: &str, profile: Option<&str>) -> aws_config::SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let Some(profile_name) = profile {
        builder = builder.profile_name(profile_name);
    }

    builder.load().await
}
