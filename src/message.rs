//! Conversation transcript entries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlates a tool call with its eventual result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Input opening a fresh turn
    User,
    /// An agent speaking, calling a tool, or receiving a tool result
    Agent,
    /// The engine itself: transfer notices and failure notices
    SystemTransfer,
    /// Input answering a suspension
    HumanPrompt,
}

/// A named tool call requested by an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Registered tool name
    pub tool: String,
    /// Command string, passed to the tool unmodified
    pub command: String,
}

/// One entry in a thread's conversation transcript.
///
/// Messages are immutable once appended; the transcript only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Present on tool-call entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolInvocation>,
    /// Present on tool-call entries and their results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<CallId>,
}

impl Message {
    /// Text input from the user opening a turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_call: None,
            call_id: None,
        }
    }

    /// Free-text reply from an agent
    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
            tool_call: None,
            call_id: None,
        }
    }

    /// Text input answering a suspended thread
    pub fn human_prompt(content: impl Into<String>) -> Self {
        Self {
            role: Role::HumanPrompt,
            content: content.into(),
            tool_call: None,
            call_id: None,
        }
    }

    /// A tool call issued by an agent
    pub fn tool_call(tool: impl Into<String>, command: impl Into<String>, call_id: CallId) -> Self {
        let invocation = ToolInvocation {
            tool: tool.into(),
            command: command.into(),
        };
        Self {
            role: Role::Agent,
            content: format!("Calling tool '{}'", invocation.tool),
            tool_call: Some(invocation),
            call_id: Some(call_id),
        }
    }

    /// The result of a tool call, correlated by `call_id`
    pub fn tool_result(content: impl Into<String>, call_id: CallId) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
            tool_call: None,
            call_id: Some(call_id),
        }
    }

    /// Notice that control was transferred to another node
    pub fn transfer(destination: &str, call_id: CallId) -> Self {
        Self {
            role: Role::SystemTransfer,
            content: format!("Successfully transferred to {destination}"),
            tool_call: None,
            call_id: Some(call_id),
        }
    }

    /// Notice that a node's capability failed; the next turn sees it in context
    pub fn failure_notice(node: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            role: Role::SystemTransfer,
            content: format!("Agent '{node}' failed: {detail}"),
            tool_call: None,
            call_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        let json = serde_json::to_string(&Role::SystemTransfer).unwrap();
        assert_eq!(json, "\"system-transfer\"");
        let json = serde_json::to_string(&Role::HumanPrompt).unwrap();
        assert_eq!(json, "\"human-prompt\"");
    }

    #[test]
    fn test_tool_call_carries_payload_and_id() {
        let id = CallId::new();
        let msg = Message::tool_call("ledger", "{\"op\":\"select\"}", id);
        assert_eq!(msg.role, Role::Agent);
        assert_eq!(msg.call_id, Some(id));
        let payload = msg.tool_call.unwrap();
        assert_eq!(payload.tool, "ledger");
        assert_eq!(payload.command, "{\"op\":\"select\"}");
    }

    #[test]
    fn test_tool_result_correlates() {
        let id = CallId::new();
        let call = Message::tool_call("ledger", "{}", id);
        let result = Message::tool_result("done", id);
        assert_eq!(call.call_id, result.call_id);
    }

    #[test]
    fn test_transfer_notice_text() {
        let msg = Message::transfer("query_agent", CallId::new());
        assert_eq!(msg.role, Role::SystemTransfer);
        assert_eq!(msg.content, "Successfully transferred to query_agent");
    }

    #[test]
    fn test_plain_messages_skip_optional_fields() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(!json.contains("tool_call"));
        assert!(!json.contains("call_id"));
    }
}
