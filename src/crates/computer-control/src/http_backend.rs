//! HTTP client for a remote computer-control server.
//!
//! The controller runs on the target machine and performs the actual input
//! events. Each action is a single `POST {base_url}/execute`:
//!
//! ```text
//! -> {"action": "mouse_move", "coordinate": [100, 200]}
//! <- {"output": "Moved mouse to (100, 200)", "base64_image": null}
//! <- {"error": "Coordinates out of bounds"}
//! ```
//!
//! Status mapping: a 2xx body with a non-null `error`, or any 4xx, is an
//! operational failure; 5xx, transport errors and undecodable bodies are
//! unexpected failures.

use crate::action::ActionRequest;
use crate::backend::{BackendOutput, ComputerBackend};
use crate::error::BackendError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Connection settings for [`HttpComputerBackend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpBackendConfig {
    /// Base URL of the controller, e.g. "http://localhost:5000".
    pub base_url: String,

    /// Optional request timeout. No timeout is applied when unset.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// [`ComputerBackend`] that forwards actions to a controller over HTTP.
#[derive(Debug, Clone)]
pub struct HttpComputerBackend {
    client: Client,
    execute_url: String,
}

impl HttpComputerBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url))
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            execute_url: format!("{}/execute", base_url.trim_end_matches('/')),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    base64_image: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl ComputerBackend for HttpComputerBackend {
    async fn execute(&self, request: ActionRequest) -> Result<BackendOutput, BackendError> {
        debug!(url = %self.execute_url, action = %request.action, "POST execute");

        let response = self.client.post(&self.execute_url).json(&request).send().await?;
        let status = response.status();

        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Operational(error_text(&body)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Unexpected(format!(
                "controller returned {}: {}",
                status, body
            )));
        }

        let body: ExecuteResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Unexpected(format!("invalid controller response: {}", e)))?;

        match body.error {
            Some(message) => Err(BackendError::Operational(message)),
            None => Ok(BackendOutput {
                output: body.output,
                base64_image: body.base64_image,
            }),
        }
    }
}

/// Pull a message out of an error body, falling back to the raw text.
fn error_text(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_url_normalized() {
        let backend = HttpComputerBackend::with_client(Client::new(), "http://localhost:5000/");
        assert_eq!(backend.execute_url, "http://localhost:5000/execute");
    }

    #[test]
    fn test_error_text() {
        assert_eq!(error_text(r#"{"error": "bad key"}"#), "bad key");
        assert_eq!(error_text(r#"{"message": "nope"}"#), "nope");
        assert_eq!(error_text("plain failure"), "plain failure");
    }

    #[test]
    fn test_config_builder() {
        let config = HttpBackendConfig::new("http://10.0.0.2:5000").with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
