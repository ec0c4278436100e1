//! Tool registry backed by the action dispatcher.

use computer_control::{ActionDispatcher, ActionResult, Intent};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// What `tools/list` reports for one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<Intent> for ToolDescriptor {
    fn from(intent: Intent) -> Self {
        Self {
            name: intent.name().to_string(),
            description: intent.description().to_string(),
            input_schema: intent.input_schema(),
        }
    }
}

/// The set of tools exposed to clients, in registration order.
pub struct ToolRegistry {
    dispatcher: ActionDispatcher,
    tools: Vec<Intent>,
}

impl ToolRegistry {
    /// A registry with no tools.
    pub fn empty(dispatcher: ActionDispatcher) -> Self {
        Self {
            dispatcher,
            tools: Vec::new(),
        }
    }

    /// A registry exposing every dispatcher entry point.
    pub fn new(dispatcher: ActionDispatcher) -> Self {
        let mut registry = Self::empty(dispatcher);
        for intent in Intent::ALL {
            registry.register(intent);
        }
        info!(count = registry.tools.len(), "registered computer-control tools");
        registry
    }

    /// Expose `intent` as a tool. Registering twice has no effect.
    pub fn register(&mut self, intent: Intent) {
        if !self.tools.contains(&intent) {
            self.tools.push(intent);
        }
    }

    pub fn get(&self, name: &str) -> Option<Intent> {
        self.tools.iter().copied().find(|intent| intent.name() == name)
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().copied().map(ToolDescriptor::from).collect()
    }

    /// Run the tool called `name`. `None` when no such tool is registered.
    pub async fn call(&self, name: &str, arguments: &Value) -> Option<ActionResult> {
        let intent = self.get(name)?;
        Some(self.dispatcher.dispatch(intent, arguments).await)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
