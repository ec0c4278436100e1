//! Configuration for the Gemini client and generation calls.

use crate::error::{GenerationError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable consulted when no credential is supplied.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Connection settings for [`GeminiClient`](crate::remote::GeminiClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout. Unset means the call may take as long as the API does.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Create a configuration for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout: None,
        }
    }

    /// Create configuration from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::ClientUnavailable(format!("{} is not set", API_KEY_ENV)))?;

        Ok(Self::new(api_key))
    }

    /// Use `api_key` when non-empty, otherwise fall back to the environment.
    pub fn resolve(api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            Self::from_env()
        } else {
            Ok(Self::new(api_key))
        }
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Per-call generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum number of tokens to generate.
    pub max_output_tokens: u32,

    /// Sampling temperature; 0.0 is deterministic.
    pub temperature: f32,

    /// Optional response MIME type, e.g. "application/json".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 4096,
            temperature: 0.0,
            response_mime_type: None,
        }
    }
}

impl GenerationParams {
    pub fn new(max_output_tokens: u32) -> Self {
        Self {
            max_output_tokens,
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_response_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.response_mime_type = Some(mime_type.into());
        self
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = GeminiConfig::new("test-key")
            .with_base_url("http://localhost:9000")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::new("k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());

        let params = GenerationParams::default();
        assert_eq!(params.temperature, 0.0);
        assert_eq!(params.max_output_tokens, 4096);
        assert!(params.response_mime_type.is_none());
    }

    #[test]
    fn test_resolve_prefers_explicit_key() {
        let config = GeminiConfig::resolve("explicit").unwrap();
        assert_eq!(config.api_key, "explicit");
    }

    #[test]
    fn test_params_builder() {
        let params = GenerationParams::new(512)
            .with_temperature(0.4)
            .with_response_mime_type("application/json");
        assert_eq!(params.max_output_tokens, 512);
        assert_eq!(params.temperature, 0.4);
        assert_eq!(params.response_mime_type.as_deref(), Some("application/json"));
    }
}
