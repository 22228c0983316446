use careguide_core::models::cost::ModelPricing;
use careguide_core::models::token_count::{TokenCount, TokenUsage};

/// Extract token counts from a Bedrock Converse response.
pub fn extract_token_usage(
    usage: &aws_sdk_bedrockruntime::types::TokenUsage,
) -> TokenCount {
    TokenCount {
        input: usage.input_tokens.max(0) as u64,
        output: usage.output_tokens.max(0) as u64,
    }
}

/// Price a token count for `model_id`; unknown models cost nothing.
pub fn usage_for(model_id: &str, tokens: TokenCount) -> TokenUsage {
    TokenUsage {
        tokens,
        cost_usd: get_pricing(model_id)
            .map(|p| p.estimate_cost(tokens))
            .unwrap_or(0.0),
    }
}

/// Known model pricing (per million tokens).
/// These are approximate and should be updated as pricing changes.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    match model_id {
        id if id.contains("claude-opus-4") => Some(ModelPricing {
            input_per_million: 15.0,
            output_per_million: 75.0,
        }),
        id if id.contains("claude-sonnet-4") => Some(ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        }),
        id if id.contains("claude-haiku") => Some(ModelPricing {
            input_per_million: 0.80,
            output_per_million: 4.0,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_models_are_free() {
        let usage = usage_for("acme.some-model", TokenCount { input: 10, output: 10 });
        assert_eq!(usage.cost_usd, 0.0);
    }

    #[test]
    fn sonnet_is_priced() {
        let usage = usage_for(
            "us.anthropic.claude-sonnet-4-20250514-v1:0",
            TokenCount {
                input: 1_000_000,
                output: 0,
            },
        );
        assert!((usage.cost_usd - 3.0).abs() < 1e-9);
    }
}
