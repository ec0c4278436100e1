//! The uniform success/error envelope returned by every dispatcher entry point.

use crate::backend::BackendOutput;
use crate::error::{BackendError, DispatchError};
use serde::{Deserialize, Serialize};

/// Outcome of one dispatcher call.
///
/// Serializes as `{"status": "success", "output": ..., "base64_image": ...}` or
/// `{"status": "error", "message": ...}`; absent optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionResult {
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base64_image: Option<String>,
    },
    Error {
        message: String,
    },
}

impl ActionResult {
    pub fn success(output: impl Into<String>) -> Self {
        ActionResult::Success {
            output: Some(output.into()),
            base64_image: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ActionResult::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success { .. })
    }

    /// Text output of a successful call.
    pub fn output(&self) -> Option<&str> {
        match self {
            ActionResult::Success { output, .. } => output.as_deref(),
            ActionResult::Error { .. } => None,
        }
    }

    /// Screenshot attached to a successful call, if any.
    pub fn base64_image(&self) -> Option<&str> {
        match self {
            ActionResult::Success { base64_image, .. } => base64_image.as_deref(),
            ActionResult::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ActionResult::Error { message } => Some(message),
            ActionResult::Success { .. } => None,
        }
    }
}

impl From<BackendOutput> for ActionResult {
    fn from(out: BackendOutput) -> Self {
        ActionResult::Success {
            output: out.output,
            base64_image: out.base64_image,
        }
    }
}

impl From<DispatchError> for ActionResult {
    fn from(err: DispatchError) -> Self {
        ActionResult::error(err.to_string())
    }
}

impl From<BackendError> for ActionResult {
    fn from(err: BackendError) -> Self {
        ActionResult::error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization_omits_missing_image() {
        let result = ActionResult::success("Waited for 2.5 seconds.");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": "success", "output": "Waited for 2.5 seconds."})
        );
    }

    #[test]
    fn test_success_with_image() {
        let result = ActionResult::from(BackendOutput {
            output: Some("Moved mouse to (1, 2)".to_string()),
            base64_image: Some("iVBORw0KGgo=".to_string()),
        });
        assert_eq!(result.base64_image(), Some("iVBORw0KGgo="));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "status": "success",
                "output": "Moved mouse to (1, 2)",
                "base64_image": "iVBORw0KGgo="
            })
        );
    }

    #[test]
    fn test_error_serialization() {
        let result = ActionResult::from(DispatchError::missing("Missing key_to_press."));
        assert!(!result.is_success());
        assert_eq!(result.output(), None);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": "error", "message": "Missing key_to_press."})
        );
    }

    #[test]
    fn test_deserialize_envelope() {
        let result: ActionResult =
            serde_json::from_value(json!({"status": "error", "message": "boom"})).unwrap();
        assert_eq!(result.error_message(), Some("boom"));
    }
}
