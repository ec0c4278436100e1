//! Action dispatch for computer-control tools.
//!
//! This crate maps a small, fixed vocabulary of tool intents (mouse move, click,
//! drag, keyboard input, cursor query, timed wait) onto a computer-control
//! backend and reports every outcome through one uniform envelope.
//!
//! # Layers
//!
//! - **Params** - defensive extraction of typed requests from a loosely-typed
//!   JSON parameter bag
//! - **Actions** - the closed backend vocabulary and the (button, click style)
//!   lookup table
//! - **Backend** - the [`ComputerBackend`] seam plus an HTTP implementation that
//!   talks to a remote controller
//! - **Dispatcher** - one entry point per intent, producing an [`ActionResult`]
//!
//! # Example
//!
//! ```rust,ignore
//! use computer_control::{ActionDispatcher, HttpBackendConfig, HttpComputerBackend};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = HttpComputerBackend::new(HttpBackendConfig::new("http://localhost:5000"))?;
//!     let dispatcher = ActionDispatcher::new(Arc::new(backend));
//!
//!     let result = dispatcher.mouse_click(&json!({"button": "right"})).await;
//!     println!("{}", serde_json::to_string(&result)?);
//!
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod backend;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod http_backend;
pub mod params;

// Re-export commonly used types
pub use action::{resolve_click, ActionRequest, ClickStyle, ComputerAction, Coordinate, MouseButton};
pub use backend::{BackendOutput, ComputerBackend};
pub use dispatcher::{ActionDispatcher, Intent};
pub use envelope::ActionResult;
pub use error::{BackendError, DispatchError, Result};
pub use http_backend::{HttpBackendConfig, HttpComputerBackend};
