//! The computer-control backend seam.

use crate::action::ActionRequest;
use crate::error::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What a backend hands back after performing an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendOutput {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub base64_image: Option<String>,
}

impl BackendOutput {
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            base64_image: None,
        }
    }

    pub fn with_image(mut self, base64_image: impl Into<String>) -> Self {
        self.base64_image = Some(base64_image.into());
        self
    }
}

/// Something that can perform mouse, keyboard and screen actions.
///
/// One instance is constructed at startup and shared by every dispatcher
/// entry point, so implementations must tolerate concurrent calls.
#[async_trait]
pub trait ComputerBackend: Send + Sync {
    /// Perform exactly one action.
    async fn execute(&self, request: ActionRequest) -> Result<BackendOutput, BackendError>;
}
