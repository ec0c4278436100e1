//! Token accounting read from a generation response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Token counts for one generation call. All zero when unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
        }
    }

    /// Read `usageMetadata.{promptTokenCount, candidatesTokenCount}` from a
    /// raw response. Any missing or mistyped field counts as zero.
    pub fn from_response(response: &Value) -> Self {
        let metadata = match response.get("usageMetadata") {
            Some(metadata) if metadata.is_object() => metadata,
            _ => {
                debug!("response carries no usage metadata");
                return Self::default();
            }
        };

        Self::new(
            count(metadata, "promptTokenCount"),
            count(metadata, "candidatesTokenCount"),
        )
    }
}

fn count(metadata: &Value, field: &str) -> u64 {
    metadata.get(field).and_then(Value::as_u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_metadata() {
        let usage = TokenUsage::from_response(&json!({
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 30, "totalTokenCount": 150}
        }));
        assert_eq!(usage, TokenUsage::new(120, 30));
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn test_partial_or_mistyped_metadata() {
        let usage = TokenUsage::from_response(&json!({
            "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": "many"}
        }));
        assert_eq!(usage, TokenUsage::new(7, 0));

        let usage = TokenUsage::from_response(&json!({"usageMetadata": {"candidatesTokenCount": 4}}));
        assert_eq!(usage.total_tokens, 4);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let usage = TokenUsage::from_response(&json!({
            "usageMetadata": {"promptTokenCount": u64::MAX, "candidatesTokenCount": 1}
        }));
        assert_eq!(usage.input_tokens, u64::MAX);
        assert_eq!(usage.output_tokens, 1);
        assert_eq!(usage.total_tokens, u64::MAX);
    }

    #[test]
    fn test_missing_metadata() {
        assert_eq!(TokenUsage::from_response(&json!({"candidates": []})), TokenUsage::default());
        assert_eq!(TokenUsage::from_response(&json!({"usageMetadata": 3})), TokenUsage::default());
        assert_eq!(TokenUsage::from_response(&Value::Null), TokenUsage::default());
    }
}
