//! Gemini history adaptation and generation for omnicontrol.
//!
//! This crate turns a loosely shaped chat history (roles such as `assistant`
//! and `tool`, text blocks, image paths) into the alternating `user`/`model`
//! turns Gemini expects, and runs a single generation call over it.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::{run_gemini_interleaved, ConversationMessage, ContentItem};
//!
//! #[tokio::main]
//! async fn main() {
//!     let messages = vec![
//!         ConversationMessage::items("user", vec![
//!             ContentItem::text_block("What is on the screen?"),
//!             ContentItem::string("/tmp/outputs/screenshot_1a2b.png"),
//!         ]),
//!     ];
//!
//!     // An empty key falls back to GEMINI_API_KEY.
//!     let outcome = run_gemini_interleaved(&messages, "", "gemini-1.5-pro", "", 1024, 0.0).await;
//!     println!("{} ({} tokens)", outcome.text, outcome.usage.total_tokens);
//! }
//! ```
//!
//! Generation never returns an error to the caller. When anything fails, the
//! outcome text describes the failure and usage is zero.

pub mod config;
pub mod error;
pub mod generation;
pub mod history;
pub mod images;
pub mod remote;
pub mod usage;

// Re-export commonly used types
pub use config::{GeminiConfig, GenerationParams, API_KEY_ENV, DEFAULT_BASE_URL};
pub use error::{GenerationError, Result};
pub use generation::{
    generate_interleaved, run_gemini_interleaved, GenerateContentRequest, GenerateContentResponse,
    GenerationOutcome, GenerativeBackend, GenerativeModel,
};
pub use history::{
    adapt_history, remap_role, AdaptedTurn, ContentBlock, ContentItem, ConversationMessage, MessageContent,
    Part, TurnRole,
};
pub use images::{is_image_path, load_image, ImageLoadError, LoadedImage};
pub use remote::GeminiClient;
pub use usage::TokenUsage;
