//! Google Gemini client implementation.
//!
//! Talks to the `generateContent` REST endpoint with the API key passed as a
//! query parameter. Image parts are sent inline as base64.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::{generate_interleaved, ConversationMessage, GeminiClient, GeminiConfig, GenerationParams};
//!
//! let client = GeminiClient::new(GeminiConfig::from_env()?)?;
//! let messages = vec![ConversationMessage::text("user", "Hello!")];
//! let outcome = generate_interleaved(&client, &messages, None, "gemini-1.5-flash", &GenerationParams::default()).await;
//! ```

use crate::config::{GeminiConfig, GenerationParams};
use crate::error::{GenerationError, Result};
use crate::generation::{GenerateContentRequest, GenerateContentResponse, GenerativeBackend};
use crate::history::{AdaptedTurn, Part};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Google Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::ClientUnavailable("API key is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GenerationError::ClientUnavailable(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        if request.model.trim().is_empty() {
            return Err(GenerationError::InvalidArgument("model name is empty".to_string()));
        }

        let url = self.endpoint(&request.model);
        let body = GeminiRequest::from_request(request);
        debug!(url = %url, turns = body.contents.len(), "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_text));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::ShapeMismatch(format!("response is not valid JSON: {}", e)))?;

        Ok(GenerateContentResponse::new(raw))
    }
}

fn status_error(status: StatusCode, body: &str) -> GenerationError {
    let message = api_error_message(body);
    match status.as_u16() {
        400 if api_error_status(body).as_deref() == Some("INVALID_ARGUMENT") => {
            GenerationError::InvalidArgument(message)
        }
        401 | 403 => GenerationError::Authentication(message),
        429 => GenerationError::RateLimitExceeded(message),
        code => GenerationError::Api { status: code, message },
    }
}

/// `error.message` of a Google API error body, or the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn api_error_status(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .pointer("/error/status")?
        .as_str()
        .map(str::to_string)
}

// Gemini API types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

impl GeminiRequest {
    fn from_request(request: &GenerateContentRequest) -> Self {
        Self {
            contents: request.contents.iter().map(GeminiContent::from_turn).collect(),
            system_instruction: request.system_instruction.as_ref().map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart::Text { text: text.clone() }],
            }),
            generation_config: GeminiGenerationConfig::from(&request.params),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn from_turn(turn: &AdaptedTurn) -> Self {
        Self {
            role: Some(turn.role.as_str()),
            parts: turn.parts.iter().map(GeminiPart::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiBlob,
    },
}

impl From<&Part> for GeminiPart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => GeminiPart::Text { text: text.clone() },
            Part::Image(image) => GeminiPart::InlineData {
                inline_data: GeminiBlob {
                    mime_type: image.mime_type.clone(),
                    data: image.to_base64(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiBlob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

impl From<&GenerationParams> for GeminiGenerationConfig {
    fn from(params: &GenerationParams) -> Self {
        Self {
            max_output_tokens: params.max_output_tokens,
            temperature: params.temperature,
            response_mime_type: params.response_mime_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::TurnRole;
    use crate::images::LoadedImage;
    use serde_json::json;

    fn request(contents: Vec<AdaptedTurn>, system: Option<&str>) -> GenerateContentRequest {
        GenerateContentRequest {
            model: "gemini-1.5-pro".to_string(),
            system_instruction: system.map(str::to_string),
            contents,
            params: GenerationParams::new(256).with_temperature(0.2),
        }
    }

    #[test]
    fn test_client_creation() {
        assert!(GeminiClient::new(GeminiConfig::new("test-key")).is_ok());

        let err = GeminiClient::new(GeminiConfig::new("  ")).err().unwrap();
        assert!(matches!(err, GenerationError::ClientUnavailable(_)));
    }

    #[test]
    fn test_endpoint() {
        let client =
            GeminiClient::new(GeminiConfig::new("k").with_base_url("http://localhost:8080/v1beta/")).unwrap();
        assert_eq!(
            client.endpoint("gemini-pro"),
            "http://localhost:8080/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let turns = vec![
            AdaptedTurn {
                role: TurnRole::User,
                parts: vec![
                    Part::Text("What is this?".to_string()),
                    Part::Image(LoadedImage {
                        file_name: "a.png".to_string(),
                        mime_type: "image/png".to_string(),
                        data: vec![1, 2, 3],
                        width: 1,
                        height: 1,
                    }),
                ],
            },
            AdaptedTurn {
                role: TurnRole::Model,
                parts: vec![Part::Text("A button.".to_string())],
            },
        ];

        let body = serde_json::to_value(GeminiRequest::from_request(&request(turns, Some("Be brief")))).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [
                        {"text": "What is this?"},
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
                    ]},
                    {"role": "model", "parts": [{"text": "A button."}]}
                ],
                "systemInstruction": {"parts": [{"text": "Be brief"}]},
                "generationConfig": {"maxOutputTokens": 256, "temperature": 0.2f32}
            })
        );
    }

    #[test]
    fn test_request_without_system_or_mime_type() {
        let body = serde_json::to_value(GeminiRequest::from_request(&request(Vec::new(), None))).unwrap();
        assert!(body.get("systemInstruction").is_none());
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_status_mapping() {
        let invalid = r#"{"error": {"code": 400, "message": "bad temperature", "status": "INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, invalid),
            GenerationError::InvalidArgument(ref m) if m == "bad temperature"
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "oops"),
            GenerationError::Api { status: 400, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "{}"),
            GenerationError::Authentication(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "quota"),
            GenerationError::RateLimitExceeded(ref m) if m == "quota"
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, ""),
            GenerationError::Api { status: 500, .. }
        ));
    }
}
