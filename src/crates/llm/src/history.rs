//! Conversation history adaptation.
//!
//! Callers keep their history in a loose chat format: a role string plus
//! either plain text or a list of items, where an item is a `{"type": "text"}`
//! block, a path to an image, or some other string. Gemini wants strictly
//! alternating `user`/`model` turns made of text and image parts.
//!
//! [`adapt_history`] bridges the two. It borrows the caller's messages and
//! builds a fresh list, so the original history is never touched.
//!
//! ```text
//! {"role": "assistant", "content": [{"type": "text", "text": "hello"}]}
//!     -> AdaptedTurn { role: Model, parts: [Text("hello")] }
//! {"role": "tool", ...}
//!     -> (dropped)
//! {"role": "user", "content": ["/tmp/missing.png"]}
//!     -> AdaptedTurn { role: User, parts: [Text("[Image not found: missing.png]")] }
//! ```

use crate::images::{is_image_path, load_image, LoadedImage};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

/// One message of the caller's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: String,
    #[serde(default)]
    pub content: MessageContent,
}

impl ConversationMessage {
    /// Message whose content is a single string.
    pub fn text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// Message whose content is a list of items.
    pub fn items(role: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            role: role.into(),
            content: MessageContent::Items(items),
        }
    }
}

/// Message content: a plain string or an ordered list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
    /// Anything else; contributes no parts.
    Unsupported(Value),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Unsupported(Value::Null)
    }
}

/// One entry of a list-shaped message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentItem {
    /// A bare string: an image path or literal text.
    Text(String),
    /// A typed block such as `{"type": "text", "text": "..."}`.
    Block(ContentBlock),
    /// Anything else; ignored.
    Unsupported(Value),
}

impl ContentItem {
    /// `{"type": "text", "text": ...}` block.
    pub fn text_block(text: impl Into<String>) -> Self {
        ContentItem::Block(ContentBlock {
            kind: "text".to_string(),
            text: Some(text.into()),
            extra: Map::new(),
        })
    }

    /// Bare string item.
    pub fn string(value: impl Into<String>) -> Self {
        ContentItem::Text(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Roles Gemini accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of an adapted turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    Image(LoadedImage),
}

impl Part {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::Image(_) => None,
        }
    }
}

/// A message after role remapping and content normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptedTurn {
    pub role: TurnRole,
    pub parts: Vec<Part>,
}

/// Map a caller role onto Gemini's vocabulary.
///
/// `assistant` becomes `model`; `tool` and unknown roles have no mapping.
pub fn remap_role(role: &str) -> Option<TurnRole> {
    match role {
        "user" => Some(TurnRole::User),
        "assistant" | "model" => Some(TurnRole::Model),
        _ => None,
    }
}

/// Convert a conversation into Gemini turns.
///
/// Never fails: unreadable images become inline placeholder text and
/// messages that end up with no parts are dropped.
pub fn adapt_history(messages: &[ConversationMessage]) -> Vec<AdaptedTurn> {
    let mut history = Vec::with_capacity(messages.len());

    for message in messages {
        let Some(role) = remap_role(&message.role) else {
            debug!(role = %message.role, "skipping message with unsupported role");
            continue;
        };

        let parts = adapt_content(&message.content);
        if parts.is_empty() {
            debug!(role = %role, "dropping message with no usable content");
            continue;
        }

        history.push(AdaptedTurn { role, parts });
    }

    history
}

fn adapt_content(content: &MessageContent) -> Vec<Part> {
    match content {
        MessageContent::Text(text) => vec![Part::Text(text.clone())],
        MessageContent::Items(items) => items.iter().filter_map(adapt_item).collect(),
        MessageContent::Unsupported(_) => Vec::new(),
    }
}

fn adapt_item(item: &ContentItem) -> Option<Part> {
    match item {
        ContentItem::Block(block) if block.kind == "text" => block.text.clone().map(Part::Text),
        ContentItem::Text(reference) if is_image_path(reference) => Some(image_part(reference)),
        ContentItem::Text(text) => Some(Part::Text(text.clone())),
        ContentItem::Block(_) | ContentItem::Unsupported(_) => None,
    }
}

fn image_part(reference: &str) -> Part {
    match load_image(reference) {
        Ok(image) => Part::Image(image),
        Err(e) => {
            warn!(path = %reference, error = ?e, "image could not be loaded, substituting placeholder");
            Part::Text(e.to_string())
        }
    }
}
