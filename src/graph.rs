//! Orchestration graph - routes conversation turns across agent nodes
//!
//! The graph owns the node set (agents plus one suspension node), the static
//! entry edge, and the routing table derived from each agent's registered
//! handoffs. `submit` drives one hop loop to either a completed reply or a
//! suspension, checkpointing position in the thread store so the next submit
//! for the same thread picks up exactly where this one stopped.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument, warn};

use crate::agent::{AgentNode, AgentOutcome};
use crate::error::Error;
use crate::human::SuspensionNode;
use crate::message::{CallId, Message};
use crate::thread::{ThreadId, ThreadStore};

/// Tunables applied to every submit call
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Maximum agent invocations per submit, counting tool re-invocations.
    /// An agent that always hands off is a legitimate failure mode; the cap
    /// turns it into a clean error instead of a hang.
    pub max_hops: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { max_hops: 16 }
    }
}

/// What a submit call produced
#[derive(Debug, Clone, PartialEq)]
pub enum GraphOutcome {
    /// The turn finished; carries every message appended during this call
    Completed(Vec<Message>),
    /// The turn suspended; resume by submitting again on the same thread
    AwaitingHuman,
}

/// Builder validating the node set and routing table before any turn runs
pub struct GraphBuilder {
    agents: Vec<AgentNode>,
    suspension: SuspensionNode,
    entry: Option<String>,
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            suspension: SuspensionNode::default(),
            entry: None,
            config: GraphConfig::default(),
        }
    }

    /// Add an agent node
    pub fn agent(mut self, agent: AgentNode) -> Self {
        self.agents.push(agent);
        self
    }

    /// Declare the static entry edge
    pub fn entry(mut self, node: impl Into<String>) -> Self {
        self.entry = Some(node.into());
        self
    }

    /// Rename the suspension node (defaults to "human")
    pub fn suspension_node(mut self, name: impl Into<String>) -> Self {
        self.suspension = SuspensionNode::new(name);
        self
    }

    /// Override submit tunables
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Cap on agent invocations per submit
    pub fn max_hops(mut self, max_hops: usize) -> Self {
        self.config.max_hops = max_hops;
        self
    }

    /// Validate wiring and produce the immutable graph.
    ///
    /// Every handoff destination must name a declared node; routing holes are
    /// rejected here, not discovered mid-conversation.
    pub fn build(self) -> Result<OrchestrationGraph, Error> {
        let entry = self
            .entry
            .ok_or_else(|| Error::InvalidGraph("no entry node declared".into()))?;

        if entry == self.suspension.name() {
            return Err(Error::InvalidGraph(
                "entry node cannot be the suspension node".into(),
            ));
        }

        let mut agents = HashMap::new();
        for agent in self.agents {
            if agent.name() == self.suspension.name() {
                return Err(Error::InvalidGraph(format!(
                    "agent '{}' collides with the suspension node",
                    agent.name()
                )));
            }
            if agents.contains_key(agent.name()) {
                return Err(Error::InvalidGraph(format!(
                    "duplicate node name '{}'",
                    agent.name()
                )));
            }
            agents.insert(agent.name().to_string(), agent);
        }

        if !agents.contains_key(&entry) {
            return Err(Error::UnknownNode(entry));
        }

        // Registered handoffs are the routing table; verify every edge lands
        // on a declared node before the first turn runs.
        let mut routing: HashMap<String, HashSet<String>> = HashMap::new();
        for agent in agents.values() {
            let mut destinations = HashSet::new();
            for dest in agent.destinations() {
                if dest != self.suspension.name() && !agents.contains_key(dest) {
                    return Err(Error::UnknownNode(dest.to_string()));
                }
                destinations.insert(dest.to_string());
            }
            routing.insert(agent.name().to_string(), destinations);
        }

        info!(
            entry = %entry,
            agents = agents.len(),
            max_hops = self.config.max_hops,
            "Built orchestration graph"
        );

        Ok(OrchestrationGraph {
            agents,
            suspension: self.suspension,
            entry,
            routing,
            store: ThreadStore::new(),
            config: self.config,
        })
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The top-level controller: node set, routing table, thread store.
///
/// Immutable after construction; all per-conversation mutation goes through
/// the thread store under that thread's lock.
pub struct OrchestrationGraph {
    agents: HashMap<String, AgentNode>,
    suspension: SuspensionNode,
    entry: String,
    routing: HashMap<String, HashSet<String>>,
    store: ThreadStore,
    config: GraphConfig,
}

impl std::fmt::Debug for OrchestrationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestrationGraph")
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .field("suspension", &self.suspension.name())
            .field("entry", &self.entry)
            .field("routing", &self.routing)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OrchestrationGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Name of the entry node
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// The thread store backing this graph
    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    /// Legal handoff destinations for a node
    pub fn destinations(&self, node: &str) -> Option<&HashSet<String>> {
        self.routing.get(node)
    }

    /// Run one conversation turn.
    ///
    /// Appends the input to the thread (creating it at the entry node if
    /// unseen), then hops until an agent replies, the suspension node is
    /// reached, or the hop cap trips. Holding the thread's lock for the whole
    /// loop serializes concurrent submits on the same thread.
    #[instrument(skip(self, text), fields(thread_id = %thread_id))]
    pub async fn submit(&self, thread_id: &ThreadId, text: &str) -> Result<GraphOutcome, Error> {
        let handle = self.store.get_or_create(thread_id, &self.entry);
        let mut state = handle.lock().await;
        let turn_start = state.len();

        if state.awaiting_human() {
            debug!(resume_at = state.active_node(), "Resuming suspended thread");
            state.push(Message::human_prompt(text));
            state.set_awaiting_human(false);
        } else {
            state.push(Message::user(text));
        }

        let mut current = state.active_node().to_string();
        let mut previous: Option<String> = None;
        let mut hops = 0usize;

        loop {
            if current == self.suspension.name() {
                let signal = self
                    .suspension
                    .on_enter(state.messages(), previous.as_deref())?;
                info!(resume_at = %signal.resume_at, "Awaiting human input");
                state.set_active_node(signal.resume_at);
                state.set_awaiting_human(true);
                return Ok(GraphOutcome::AwaitingHuman);
            }

            hops += 1;
            if hops > self.config.max_hops {
                warn!(node = %current, max_hops = self.config.max_hops, "Hop cap exceeded");
                return Err(Error::RunawayRouting {
                    hops: self.config.max_hops,
                });
            }

            let node = self
                .agents
                .get(&current)
                .ok_or_else(|| Error::UnknownNode(current.clone()))?;

            let outcome = match node.evaluate(state.messages()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    // Recoverable: the failure goes into the transcript and
                    // the agent sees it in context on its next turn.
                    warn!(node = %current, error = %e, "Capability failed");
                    state.push(Message::failure_notice(&current, e));
                    state.set_active_node(&self.entry);
                    return Ok(GraphOutcome::Completed(state.messages()[turn_start..].to_vec()));
                }
            };

            match outcome {
                AgentOutcome::Reply(reply) => {
                    debug!(node = %current, hops, "Turn completed");
                    state.push(Message::agent(reply));
                    state.set_active_node(&self.entry);
                    return Ok(GraphOutcome::Completed(state.messages()[turn_start..].to_vec()));
                }
                AgentOutcome::ToolCall { tool, command } => {
                    let handler = node.tool(&tool).ok_or_else(|| Error::ToolNotFound(tool.clone()))?;
                    let call_id = CallId::new();
                    debug!(node = %current, tool = %tool, %call_id, "Dispatching tool call");
                    state.push(Message::tool_call(&tool, &command, call_id));

                    let result = handler.call(&command).await;
                    if result.is_failure() {
                        debug!(node = %current, tool = %tool, "Tool reported failure");
                    }
                    let content = serde_json::to_string(&result).unwrap_or_else(|e| {
                        format!("{{\"status\":\"failure\",\"message\":\"unserializable tool outcome: {e}\"}}")
                    });
                    state.push(Message::tool_result(content, call_id));
                    // Same agent goes again with the result in context; the
                    // hop counter above bounds this loop too.
                }
                AgentOutcome::Handoff { destination } => {
                    let authorized = self
                        .routing
                        .get(&current)
                        .is_some_and(|dests| dests.contains(&destination));
                    let handoff = node.handoff_for(&destination).filter(|_| authorized);
                    let Some(handoff) = handoff else {
                        return Err(Error::UnauthorizedHandoff {
                            from: current,
                            to: destination,
                        });
                    };

                    let signal = handoff.signal();
                    info!(from = %current, to = %signal.destination, "Handoff");
                    state.push(signal.notice);
                    previous = Some(std::mem::replace(&mut current, signal.destination));
                }
            }
        }
    }
}
