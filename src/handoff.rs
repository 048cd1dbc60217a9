//! Handoff tools - explicit control transfer between agents
//!
//! A handoff is a tool-shaped operation: one instance per destination,
//! registered on the emitting agent at construction time. That registration
//! *is* the agent's routing-table entry - the graph derives the set of legal
//! destinations from it and validates the whole table at build time.

use crate::message::{CallId, Message};

/// A callable control-transfer operation targeting one destination node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffTool {
    destination: String,
}

impl HandoffTool {
    /// Create a handoff tool targeting the named node
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// The node this handoff transfers control to
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Tool-style name, one per destination
    pub fn name(&self) -> String {
        format!("transfer_to_{}", self.destination)
    }

    /// Emit the control-transfer signal and its transcript notice
    pub fn signal(&self) -> HandoffSignal {
        HandoffSignal {
            destination: self.destination.clone(),
            notice: Message::transfer(&self.destination, CallId::new()),
        }
    }
}

/// A control-transfer directive, consumed immediately by the graph.
///
/// Never persisted on its own; only the `notice` message it carries ends up
/// in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct HandoffSignal {
    /// Node to run next
    pub destination: String,
    /// Transfer notice appended to the conversation
    pub notice: Message,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn test_tool_name_per_destination() {
        let handoff = HandoffTool::new("query_agent");
        assert_eq!(handoff.name(), "transfer_to_query_agent");
        assert_eq!(handoff.destination(), "query_agent");
    }

    #[test]
    fn test_signal_carries_notice() {
        let signal = HandoffTool::new("insert_agent").signal();
        assert_eq!(signal.destination, "insert_agent");
        assert_eq!(signal.notice.role, Role::SystemTransfer);
        assert_eq!(signal.notice.content, "Successfully transferred to insert_agent");
        assert!(signal.notice.call_id.is_some());
    }
}
