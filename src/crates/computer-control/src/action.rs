//! Backend action vocabulary and click resolution.

use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Screen coordinate passed to the backend as `[x, y]`.
pub type Coordinate = (i32, i32);

/// Every action token the computer-control backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputerAction {
    MouseMove,
    LeftClick,
    RightClick,
    MiddleClick,
    DoubleClick,
    LeftClickDrag,
    Type,
    Key,
    CursorPosition,
    Wait,
}

impl ComputerAction {
    /// All known actions.
    pub const ALL: [ComputerAction; 10] = [
        ComputerAction::MouseMove,
        ComputerAction::LeftClick,
        ComputerAction::RightClick,
        ComputerAction::MiddleClick,
        ComputerAction::DoubleClick,
        ComputerAction::LeftClickDrag,
        ComputerAction::Type,
        ComputerAction::Key,
        ComputerAction::CursorPosition,
        ComputerAction::Wait,
    ];

    /// Wire token for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputerAction::MouseMove => "mouse_move",
            ComputerAction::LeftClick => "left_click",
            ComputerAction::RightClick => "right_click",
            ComputerAction::MiddleClick => "middle_click",
            ComputerAction::DoubleClick => "double_click",
            ComputerAction::LeftClickDrag => "left_click_drag",
            ComputerAction::Type => "type",
            ComputerAction::Key => "key",
            ComputerAction::CursorPosition => "cursor_position",
            ComputerAction::Wait => "wait",
        }
    }
}

impl fmt::Display for ComputerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputerAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComputerAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Unknown computer action: {}", s))
    }
}

/// Mouse button named by a click intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl FromStr for MouseButton {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            _ => Err(()),
        }
    }
}

/// Single or double click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStyle {
    Click,
    Double,
}

impl FromStr for ClickStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "click" => Ok(ClickStyle::Click),
            "double" => Ok(ClickStyle::Double),
            _ => Err(()),
        }
    }
}

/// Resolve a click intent to its backend action.
///
/// Matching is case-insensitive. Pairs outside the table (including
/// unrecognized names) yield [`DispatchError::UnsupportedCombination`]
/// carrying the caller's original spelling.
pub fn resolve_click(button: &str, click_type: &str) -> Result<ComputerAction, DispatchError> {
    let pair = (button.parse::<MouseButton>(), click_type.parse::<ClickStyle>());

    match pair {
        (Ok(MouseButton::Left), Ok(ClickStyle::Click)) => Ok(ComputerAction::LeftClick),
        (Ok(MouseButton::Right), Ok(ClickStyle::Click)) => Ok(ComputerAction::RightClick),
        (Ok(MouseButton::Middle), Ok(ClickStyle::Click)) => Ok(ComputerAction::MiddleClick),
        (Ok(MouseButton::Left), Ok(ClickStyle::Double)) => Ok(ComputerAction::DoubleClick),
        _ => Err(DispatchError::UnsupportedCombination {
            button: button.to_string(),
            click_type: click_type.to_string(),
        }),
    }
}

/// A fully resolved backend call: exactly one action plus its optional inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: ComputerAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
}

impl ActionRequest {
    pub fn new(action: ComputerAction) -> Self {
        Self {
            action,
            text: None,
            coordinate: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_coordinate(mut self, x: i32, y: i32) -> Self {
        self.coordinate = Some((x, y));
        self
    }
}
