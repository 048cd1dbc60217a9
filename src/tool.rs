//! External tool seam - callable operations available to agents

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Whether a tool call succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Failure,
}

/// Result envelope returned by every tool call.
///
/// A `Failure` status is a normal outcome surfaced into the conversation,
/// never an error that aborts routing - the calling agent sees it in context
/// on its next turn and decides what to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub status: ToolStatus,
    /// Ordered records, for read-style commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<serde_json::Value>>,
    /// Detail text, for write-style commands and failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ToolOutcome {
    /// Successful call with a detail message and no records
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Success,
            results: None,
            message: Some(message.into()),
        }
    }

    /// Successful call returning an ordered record set
    pub fn records(results: Vec<serde_json::Value>) -> Self {
        Self {
            status: ToolStatus::Success,
            results: Some(results),
            message: None,
        }
    }

    /// Failed call with an explanatory message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Failure,
            results: None,
            message: Some(message.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == ToolStatus::Failure
    }
}

/// A callable operation exposed to agents.
///
/// The command string is passed through unmodified; validating it is the
/// tool's concern. Implementations report problems through the outcome's
/// `Failure` status rather than panicking.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name agents use to address this tool
    fn name(&self) -> &str;

    /// Execute a single command
    async fn call(&self, command: &str) -> ToolOutcome;
}

/// Registry of tools available to an agent
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its own name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        async fn call(&self, command: &str) -> ToolOutcome {
            ToolOutcome::success(command.to_string())
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_call_through_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let tool = registry.get("echo").unwrap();
        let outcome = tool.call("ping").await;
        assert_eq!(outcome.status, ToolStatus::Success);
        assert_eq!(outcome.message.as_deref(), Some("ping"));
    }

    #[test]
    fn test_outcome_envelope_shape() {
        let json = serde_json::to_string(&ToolOutcome::failure("bad command")).unwrap();
        assert!(json.contains("\"status\":\"failure\""));
        assert!(json.contains("bad command"));
        assert!(!json.contains("results"));
    }

    #[test]
    fn test_records_outcome() {
        let outcome = ToolOutcome::records(vec![serde_json::json!({"item": "coffee"})]);
        assert!(!outcome.is_failure());
        assert_eq!(outcome.results.unwrap().len(), 1);
    }
}
