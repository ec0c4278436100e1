//! Single-shot interleaved generation.
//!
//! [`generate_interleaved`] is the entry point most callers want: it adapts a
//! conversation, sends exactly one request through a [`GenerativeBackend`] and
//! reduces whatever came back to a [`GenerationOutcome`]. Failures never
//! escape; they are described in the outcome text and usage stays zero.

use crate::config::{GeminiConfig, GenerationParams};
use crate::error::{GenerationError, Result};
use crate::history::{adapt_history, AdaptedTurn, ConversationMessage};
use crate::remote::GeminiClient;
use crate::usage::TokenUsage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

/// Everything one `generateContent` call needs.
#[derive(Debug, Clone)]
pub struct GenerateContentRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub contents: Vec<AdaptedTurn>,
    pub params: GenerationParams,
}

/// Raw response of a generation call.
///
/// Kept as JSON because its shape varies between API versions and between
/// successful and blocked answers; accessors read it defensively.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateContentResponse {
    raw: Value,
}

impl GenerateContentResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Result<String> {
        let candidate = self
            .raw
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first())
            .ok_or_else(|| GenerationError::ShapeMismatch("response has no candidates".to_string()))?;

        let parts = candidate
            .pointer("/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                let reason = candidate
                    .get("finishReason")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                GenerationError::ShapeMismatch(format!(
                    "candidate has no content parts (finish reason: {})",
                    reason
                ))
            })?;

        let texts: Vec<&str> = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();

        if texts.is_empty() {
            return Err(GenerationError::ShapeMismatch(
                "candidate content has no text parts".to_string(),
            ));
        }

        Ok(texts.concat())
    }

    /// Token usage, all zero when the response carries none.
    pub fn usage(&self) -> TokenUsage {
        TokenUsage::from_response(&self.raw)
    }
}

/// A remote API that can answer `generateContent` requests.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse>;
}

/// A backend bound to one model and system instruction.
pub struct GenerativeModel<'a> {
    backend: &'a dyn GenerativeBackend,
    model: String,
    system_instruction: Option<String>,
}

impl<'a> GenerativeModel<'a> {
    /// An empty system instruction is treated as absent.
    pub fn new(
        backend: &'a dyn GenerativeBackend,
        model: impl Into<String>,
        system_instruction: Option<&str>,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            system_instruction: system_instruction
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    pub async fn generate_content(
        &self,
        contents: Vec<AdaptedTurn>,
        params: &GenerationParams,
    ) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
            contents,
            params: params.clone(),
        };
        self.backend.generate_content(&request).await
    }
}

/// Text and token usage of one generation call.
///
/// On failure `text` describes what went wrong and `usage` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub text: String,
    pub usage: TokenUsage,
}

impl GenerationOutcome {
    pub fn failed(err: &GenerationError) -> Self {
        Self {
            text: err.to_string(),
            usage: TokenUsage::default(),
        }
    }
}

/// Adapt `messages` and run one generation call through `backend`.
pub async fn generate_interleaved(
    backend: &dyn GenerativeBackend,
    messages: &[ConversationMessage],
    system: Option<&str>,
    model: &str,
    params: &GenerationParams,
) -> GenerationOutcome {
    let handle = GenerativeModel::new(backend, model, system);
    let history = adapt_history(messages);

    info!(
        model = %model,
        history_size = history.len(),
        has_system_instruction = handle.system_instruction().is_some(),
        "calling Gemini API"
    );

    match request_once(&handle, history, params).await {
        Ok(outcome) => {
            info!(
                input_tokens = outcome.usage.input_tokens,
                output_tokens = outcome.usage.output_tokens,
                total_tokens = outcome.usage.total_tokens,
                "Gemini response received"
            );
            outcome
        }
        Err(e) => {
            error!(kind = e.kind(), auth = e.is_auth_error(), error = %e, "Gemini call failed");
            GenerationOutcome::failed(&e)
        }
    }
}

async fn request_once(
    handle: &GenerativeModel<'_>,
    history: Vec<AdaptedTurn>,
    params: &GenerationParams,
) -> Result<GenerationOutcome> {
    let response = handle.generate_content(history, params).await?;
    let text = response.text()?;
    Ok(GenerationOutcome {
        text,
        usage: response.usage(),
    })
}

/// Build a Gemini client from `api_key` and run one interleaved call.
///
/// An empty `api_key` falls back to `GEMINI_API_KEY`. An empty `system` sets
/// no system instruction.
pub async fn run_gemini_interleaved(
    messages: &[ConversationMessage],
    system: &str,
    model_name: &str,
    api_key: &str,
    max_tokens: u32,
    temperature: f32,
) -> GenerationOutcome {
    let params = GenerationParams::new(max_tokens).with_temperature(temperature);
    let client = match GeminiConfig::resolve(api_key).and_then(GeminiClient::new) {
        Ok(client) => client,
        Err(e) => {
            error!(
                kind = e.kind(),
                auth = e.is_auth_error(),
                error = %e,
                "Gemini client could not be initialized"
            );
            return GenerationOutcome::failed(&e);
        }
    };

    generate_interleaved(&client, messages, Some(system), model_name, &params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_concatenates_parts() {
        let response = GenerateContentResponse::new(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]}}]
        }));
        assert_eq!(response.text().unwrap(), "Hello, world");
    }

    #[test]
    fn test_text_shape_mismatches() {
        let err = GenerateContentResponse::new(json!({})).text().unwrap_err();
        assert!(matches!(err, GenerationError::ShapeMismatch(_)));

        let err = GenerateContentResponse::new(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .text()
        .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));

        let err = GenerateContentResponse::new(json!({
            "candidates": [{"content": {"parts": [{"inlineData": {}}]}}]
        }))
        .text()
        .unwrap_err();
        assert!(matches!(err, GenerationError::ShapeMismatch(_)));
    }

    #[test]
    fn test_failed_outcome_has_zero_usage() {
        let outcome = GenerationOutcome::failed(&GenerationError::InvalidArgument("bad".into()));
        assert_eq!(outcome.usage, TokenUsage::default());
        assert!(outcome.text.starts_with("Type error during Gemini call"));
    }
}
