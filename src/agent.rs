//! Agent unit - one reasoning capability plus its callable operations

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::handoff::HandoffTool;
use crate::message::Message;
use crate::tool::{Tool, ToolRegistry};

/// What an agent decided to do with the conversation.
///
/// Exactly three variants; the graph pattern-matches exhaustively, so a new
/// outcome kind is a compile-time-checked addition.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// Free-text reply ending the turn
    Reply(String),
    /// Invoke a named tool with a command string, then re-evaluate
    ToolCall { tool: String, command: String },
    /// Transfer control to the named node
    Handoff { destination: String },
}

/// The black-box reasoning seam behind an agent.
///
/// Given the agent's fixed behavioral directive and a view of the transcript,
/// decides the next action. May be slow, may fail, and is never assumed
/// idempotent - the graph treats every invocation as fresh.
#[async_trait]
pub trait Capability: Send + Sync {
    async fn evaluate(&self, directive: &str, transcript: &[Message])
        -> anyhow::Result<AgentOutcome>;
}

/// A single agent node: name, directive, capability handle, tools, and the
/// handoff destinations it registered at construction.
///
/// An agent never mutates conversation state itself; it returns an intention
/// and the graph performs all writes.
pub struct AgentNode {
    name: String,
    directive: String,
    capability: Arc<dyn Capability>,
    tools: Arc<ToolRegistry>,
    handoffs: Vec<HandoffTool>,
}

impl AgentNode {
    /// Create an agent with no tools and no handoff destinations
    pub fn new(
        name: impl Into<String>,
        directive: impl Into<String>,
        capability: Arc<dyn Capability>,
    ) -> Self {
        let name = name.into();
        debug!(node = %name, "Creating agent node");
        Self {
            name,
            directive: directive.into(),
            capability,
            tools: Arc::new(ToolRegistry::new()),
            handoffs: Vec::new(),
        }
    }

    /// Attach a shared tool registry
    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    /// Register a handoff destination this agent may transfer to
    pub fn with_handoff(mut self, destination: impl Into<String>) -> Self {
        self.handoffs.push(HandoffTool::new(destination));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Declared handoff destinations, in registration order
    pub fn destinations(&self) -> Vec<&str> {
        self.handoffs.iter().map(HandoffTool::destination).collect()
    }

    /// The handoff tool for a destination, if registered
    pub fn handoff_for(&self, destination: &str) -> Option<&HandoffTool> {
        self.handoffs.iter().find(|h| h.destination() == destination)
    }

    /// Look up one of this agent's tools
    pub fn tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Ask the capability for the next action
    #[instrument(skip(self, transcript), fields(node = %self.name))]
    pub async fn evaluate(&self, transcript: &[Message]) -> anyhow::Result<AgentOutcome> {
        debug!(messages = transcript.len(), "Evaluating agent");
        self.capability.evaluate(&self.directive, transcript).await
    }
}
