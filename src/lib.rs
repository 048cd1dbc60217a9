//! # Palaver
//!
//! Conversation routing engine for multi-agent dialogues - the long talk.
//!
//! This crate implements an orchestration graph that routes a conversation
//! between autonomous agents and a human user. Agents transfer control with
//! explicit handoff signals, suspend cooperatively to wait for human input,
//! and every thread's transcript and graph position is checkpointed so a
//! dialogue can pause and continue indefinitely.
//!
//! ## Architecture
//!
//! ```text
//!                    submit(thread_id, text)
//!                             │
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ORCHESTRATION GRAPH                       │
//! │   ┌──────────────┐   ┌───────────────┐   ┌───────────────┐  │
//! │   │ Routing Table│   │   Hop Loop    │   │ Thread Store  │  │
//! │   └──────────────┘   └───────────────┘   └───────────────┘  │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ entry                        │ handoff
//!                ▼                              ▼
//!        ┌──────────────┐   transfer    ┌──────────────┐
//!        │ Entry Agent  │──────────────▶│  Specialist  │──▶ tools
//!        └──────┬───────┘               └──────┬───────┘
//!               │         suspend              │
//!               └──────────────┬───────────────┘
//!                              ▼
//!                      ┌──────────────┐
//!                      │  Human Node  │ ──▶ AwaitingHuman
//!                      └──────────────┘      (resume at the
//!                                             triggering agent)
//! ```
//!
//! ## Key Concepts
//!
//! - **Thread**: one persistent, resumable conversation, keyed by an opaque id
//! - **Handoff**: an explicit control transfer naming the next agent to run
//! - **Suspension**: a pause yielding control to the caller until human input
//!   arrives as a new `submit` on the same thread
//! - **Hop**: one agent invocation within a single `submit` call's loop

pub mod agent;
pub mod error;
pub mod graph;
pub mod handoff;
pub mod human;
pub mod ledger;
pub mod message;
pub mod thread;
pub mod tool;

pub use agent::{AgentNode, AgentOutcome, Capability};
pub use error::Error;
pub use graph::{GraphBuilder, GraphConfig, GraphOutcome, OrchestrationGraph};
pub use handoff::{HandoffSignal, HandoffTool};
pub use human::{SuspendSignal, SuspensionNode};
pub use ledger::{LedgerTool, Transaction};
pub use message::{CallId, Message, Role, ToolInvocation};
pub use thread::{ThreadHandle, ThreadId, ThreadState, ThreadStore};
pub use tool::{Tool, ToolOutcome, ToolRegistry, ToolStatus};
