//! Intent entry points on top of a [`ComputerBackend`].
//!
//! Every entry point follows the same shape: extract a typed request from the
//! parameter bag, resolve exactly one [`ComputerAction`], invoke the backend at
//! most once, and fold whatever happened into an [`ActionResult`]. Nothing here
//! returns `Err`; validation and backend failures are both error envelopes.

use crate::action::{resolve_click, ActionRequest, ComputerAction};
use crate::backend::ComputerBackend;
use crate::envelope::ActionResult;
use crate::error::{BackendError, DispatchError};
use crate::params::{
    FromParams, KeyboardPressKeyParams, KeyboardTypeParams, MouseClickParams, MouseDragParams,
    MouseMoveParams, WaitParams,
};
use futures::FutureExt;
use serde_json::{json, Value};
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The tool intents exposed to remote callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MouseMove,
    MouseClick,
    MouseDrag,
    KeyboardType,
    KeyboardPressKey,
    GetCursorPosition,
    WaitSeconds,
}

impl Intent {
    pub const ALL: [Intent; 7] = [
        Intent::MouseMove,
        Intent::MouseClick,
        Intent::MouseDrag,
        Intent::KeyboardType,
        Intent::KeyboardPressKey,
        Intent::GetCursorPosition,
        Intent::WaitSeconds,
    ];

    /// Stable tool name used by the registry.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::MouseMove => "mouse_move",
            Intent::MouseClick => "mouse_click",
            Intent::MouseDrag => "mouse_drag",
            Intent::KeyboardType => "keyboard_type",
            Intent::KeyboardPressKey => "keyboard_press_key",
            Intent::GetCursorPosition => "get_cursor_position",
            Intent::WaitSeconds => "wait_seconds",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Intent::MouseMove => "Move the mouse cursor to absolute screen coordinates.",
            Intent::MouseClick => {
                "Click a mouse button at the current cursor position (left/right/middle click, or left double-click)."
            }
            Intent::MouseDrag => "Press the left button and drag to absolute screen coordinates.",
            Intent::KeyboardType => "Type a string of text.",
            Intent::KeyboardPressKey => "Press a single key or key combination.",
            Intent::GetCursorPosition => "Report the current mouse cursor position.",
            Intent::WaitSeconds => {
                "Wait for the given number of seconds; without a positive duration the backend's default wait is used."
            }
        }
    }

    /// JSON schema describing the accepted parameters.
    pub fn input_schema(&self) -> Value {
        let coordinate_schema = json!({
            "type": "object",
            "properties": {
                "x": {"type": "integer", "description": "Horizontal screen coordinate"},
                "y": {"type": "integer", "description": "Vertical screen coordinate"}
            },
            "required": ["x", "y"]
        });

        match self {
            Intent::MouseMove | Intent::MouseDrag => coordinate_schema,
            Intent::MouseClick => json!({
                "type": "object",
                "properties": {
                    "button": {
                        "type": "string",
                        "description": "left, right or middle (case-insensitive)",
                        "default": "left"
                    },
                    "click_type": {
                        "type": "string",
                        "description": "click or double (case-insensitive); double is left-button only",
                        "default": "click"
                    }
                }
            }),
            Intent::KeyboardType => json!({
                "type": "object",
                "properties": {"text_to_type": {"type": "string"}},
                "required": ["text_to_type"]
            }),
            Intent::KeyboardPressKey => json!({
                "type": "object",
                "properties": {"key_to_press": {"type": "string"}},
                "required": ["key_to_press"]
            }),
            Intent::GetCursorPosition => json!({"type": "object", "properties": {}}),
            Intent::WaitSeconds => json!({
                "type": "object",
                "properties": {"duration": {"type": "number", "default": 0.0}}
            }),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.name() == s)
            .ok_or_else(|| format!("Unknown intent: {}", s))
    }
}

/// Maps intents onto a shared computer-control backend.
#[derive(Clone)]
pub struct ActionDispatcher {
    backend: Arc<dyn ComputerBackend>,
}

impl ActionDispatcher {
    /// Create a dispatcher around a long-lived backend handle.
    pub fn new(backend: Arc<dyn ComputerBackend>) -> Self {
        Self { backend }
    }

    /// Route a call by intent.
    pub async fn dispatch(&self, intent: Intent, params: &Value) -> ActionResult {
        debug!(intent = %intent, "dispatching intent");
        match intent {
            Intent::MouseMove => self.mouse_move(params).await,
            Intent::MouseClick => self.mouse_click(params).await,
            Intent::MouseDrag => self.mouse_drag(params).await,
            Intent::KeyboardType => self.keyboard_type(params).await,
            Intent::KeyboardPressKey => self.keyboard_press_key(params).await,
            Intent::GetCursorPosition => self.get_cursor_position(params).await,
            Intent::WaitSeconds => self.wait_seconds(params).await,
        }
    }

    pub async fn mouse_move(&self, params: &Value) -> ActionResult {
        match MouseMoveParams::from_params(params) {
            Ok(p) => {
                self.invoke(ActionRequest::new(ComputerAction::MouseMove).with_coordinate(p.x, p.y))
                    .await
            }
            Err(e) => rejected(Intent::MouseMove, e),
        }
    }

    pub async fn mouse_click(&self, params: &Value) -> ActionResult {
        let action = MouseClickParams::from_params(params)
            .and_then(|p| resolve_click(&p.button, &p.click_type));

        match action {
            Ok(action) => self.invoke(ActionRequest::new(action)).await,
            Err(e) => rejected(Intent::MouseClick, e),
        }
    }

    pub async fn mouse_drag(&self, params: &Value) -> ActionResult {
        match MouseDragParams::from_params(params) {
            Ok(p) => {
                self.invoke(ActionRequest::new(ComputerAction::LeftClickDrag).with_coordinate(p.x, p.y))
                    .await
            }
            Err(e) => rejected(Intent::MouseDrag, e),
        }
    }

    pub async fn keyboard_type(&self, params: &Value) -> ActionResult {
        match KeyboardTypeParams::from_params(params) {
            Ok(p) => {
                self.invoke(ActionRequest::new(ComputerAction::Type).with_text(p.text_to_type))
                    .await
            }
            Err(e) => rejected(Intent::KeyboardType, e),
        }
    }

    pub async fn keyboard_press_key(&self, params: &Value) -> ActionResult {
        match KeyboardPressKeyParams::from_params(params) {
            Ok(p) => {
                self.invoke(ActionRequest::new(ComputerAction::Key).with_text(p.key_to_press))
                    .await
            }
            Err(e) => rejected(Intent::KeyboardPressKey, e),
        }
    }

    /// Takes no parameters; the bag is accepted for a uniform signature.
    pub async fn get_cursor_position(&self, _params: &Value) -> ActionResult {
        self.invoke(ActionRequest::new(ComputerAction::CursorPosition))
            .await
    }

    /// A positive duration is slept here without touching the backend, whose
    /// own `wait` is a fixed delay. Anything else falls back to that `wait`.
    pub async fn wait_seconds(&self, params: &Value) -> ActionResult {
        let WaitParams { duration, display } = match WaitParams::from_params(params) {
            Ok(p) => p,
            Err(e) => return rejected(Intent::WaitSeconds, e),
        };

        if duration > 0.0 {
            let delay = match Duration::try_from_secs_f64(duration) {
                Ok(delay) => delay,
                Err(_) => {
                    return rejected(
                        Intent::WaitSeconds,
                        DispatchError::invalid("duration", "a representable number of seconds"),
                    )
                }
            };
            info!(seconds = duration, "waiting");
            tokio::time::sleep(delay).await;
            return ActionResult::success(format!("Waited for {} seconds.", display));
        }

        self.invoke(ActionRequest::new(ComputerAction::Wait)).await
    }

    /// Call the backend once and fold every outcome into an envelope.
    async fn invoke(&self, request: ActionRequest) -> ActionResult {
        let action = request.action;
        info!(action = %action, "invoking computer backend");

        let outcome = AssertUnwindSafe(self.backend.execute(request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(BackendError::Unexpected(panic_message(panic))));

        match outcome {
            Ok(out) => ActionResult::from(out),
            Err(e) => {
                warn!(action = %action, error = %e, "computer backend call failed");
                ActionResult::from(e)
            }
        }
    }
}

fn rejected(intent: Intent, err: DispatchError) -> ActionResult {
    warn!(intent = %intent, error = %err, "rejected before backend call");
    ActionResult::from(err)
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "backend panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_names_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(intent.name().parse::<Intent>(), Ok(intent));
        }
        assert!("handle_mouse_move".parse::<Intent>().is_err());
    }

    #[test]
    fn test_required_fields_in_schema() {
        let schema = Intent::KeyboardType.input_schema();
        assert_eq!(schema["required"][0], "text_to_type");

        let schema = Intent::MouseDrag.input_schema();
        assert_eq!(schema["required"], json!(["x", "y"]));

        assert!(Intent::WaitSeconds.input_schema().get("required").is_none());
    }

    #[test]
    fn test_click_schema_accepts_any_casing() {
        let schema = Intent::MouseClick.input_schema();
        for field in ["button", "click_type"] {
            let property = &schema["properties"][field];
            assert_eq!(property["type"], "string");
            assert!(property.get("enum").is_none(), "{} must not restrict casing", field);
        }
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(42u8)), "backend panicked");
    }
}
