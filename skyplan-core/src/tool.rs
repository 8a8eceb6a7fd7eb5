use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod weather;

/// Errors surfaced by the capability table itself.
///
/// Provider failures do not appear here: the weather capability folds
/// them into its structured `{"error": ...}` payload instead (see
/// [`weather::WeatherTool`]).
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("No tool named '{0}' is registered")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Schema-described capability entry announced to the agent loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: JsonValue,
    pub output_schema: JsonValue,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: JsonValue::Null,
            output_schema: JsonValue::Null,
        }
    }

    pub fn with_input_schema(mut self, schema: JsonValue) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn with_output_schema(mut self, schema: JsonValue) -> Self {
        self.output_schema = schema;
        self
    }
}

/// A named callable the agent loop may select autonomously.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and schemas shown to the decision-maker.
    fn definition(&self) -> ToolDefinition;

    /// Execute with JSON arguments matching the input schema.
    async fn call(&self, args: JsonValue) -> Result<JsonValue, ToolError>;

    fn name(&self) -> String {
        self.definition().name
    }
}

/// Lookup table mapping capability name to handler.
///
/// The agent loop is an opaque scheduler from this crate's point of view:
/// it reads `definitions()` and dispatches through `call`. Nothing here
/// decides which capability runs.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its definition name.
    ///
    /// # Panics
    /// Panics when a tool with the same name is already registered; the
    /// table is assembled once at startup.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        let name = tool.definition().name;
        if self.tools.contains_key(&name) {
            panic!("Tool '{name}' is already registered");
        }
        self.tools.insert(name, Arc::new(tool));
        self
    }

    /// Definitions of every registered tool, for the agent loop to read.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Call a tool by name.
    pub async fn call(&self, name: &str, args: JsonValue) -> Result<JsonValue, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.call(args).await
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
