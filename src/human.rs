//! Suspension node - the pause point where the graph waits for a human
//!
//! Reaching this node halts the hop loop. The node itself is stateless; its
//! sole job is to compute the resume target from the agent that held control
//! immediately before suspension, so the human's answer is routed back to
//! that same agent instead of restarting from the entry node.

use tracing::debug;

use crate::error::Error;
use crate::message::Message;

/// Directive to store before yielding control back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspendSignal {
    /// Node the next submit for this thread resumes at
    pub resume_at: String,
}

/// The designated human-input node of a graph
pub struct SuspensionNode {
    name: String,
}

impl SuspensionNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compute the resume target on entering suspension.
    ///
    /// Exactly one agent must have held control immediately before; arriving
    /// here with none is a configuration error, never a silent reroute.
    pub fn on_enter(
        &self,
        transcript: &[Message],
        triggering_node: Option<&str>,
    ) -> Result<SuspendSignal, Error> {
        let resume_at = triggering_node.ok_or(Error::AmbiguousResume)?;
        debug!(
            node = %self.name,
            resume_at,
            messages = transcript.len(),
            "Suspending for human input"
        );
        Ok(SuspendSignal {
            resume_at: resume_at.to_string(),
        })
    }
}

impl Default for SuspensionNode {
    fn default() -> Self {
        Self::new("human")
    }
}
