//! Remote generation backends.
//!
//! # Providers
//!
//! - **Gemini** - Google's Gemini models over the `generateContent` REST API

pub mod gemini;

pub use gemini::GeminiClient;
