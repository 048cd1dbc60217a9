//! Palaver error types

use thiserror::Error;

/// Errors that can occur while building or running an orchestration graph
#[derive(Debug, Error)]
pub enum Error {
    /// Graph construction rejected the node set or wiring
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// A node name was referenced that is not part of the graph
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// An agent named a handoff destination it never registered
    #[error("Handoff from '{from}' to undeclared destination '{to}'")]
    UnauthorizedHandoff { from: String, to: String },

    /// The suspension node was reached with no agent to resume at
    #[error("Suspension reached with no active agent to resume")]
    AmbiguousResume,

    /// An agent called a tool that is not in its registry
    #[error("Tool not registered: {0}")]
    ToolNotFound(String),

    /// The hop loop exceeded its cap without reaching a reply or suspension
    #[error("Routing exceeded {hops} hops without completing")]
    RunawayRouting { hops: usize },
}
