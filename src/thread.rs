//! Thread state - the checkpointed conversation a graph routes over

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::message::Message;

/// Opaque identifier correlating submits to one conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Wrap a caller-supplied token
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ThreadId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One thread's checkpointed state: transcript, graph position, and whether
/// it is suspended waiting on human input.
///
/// The transcript is append-only; entries are never reordered or removed.
pub struct ThreadState {
    id: ThreadId,
    messages: Vec<Message>,
    active_node: String,
    awaiting_human: bool,
}

impl ThreadState {
    fn new(id: ThreadId, entry_node: &str) -> Self {
        Self {
            id,
            messages: Vec::new(),
            active_node: entry_node.to_string(),
            awaiting_human: false,
        }
    }

    pub fn id(&self) -> &ThreadId {
        &self.id
    }

    /// Full transcript, in append order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message; the only way the transcript changes
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Node the next submit resumes at
    pub fn active_node(&self) -> &str {
        &self.active_node
    }

    pub fn set_active_node(&mut self, node: impl Into<String>) {
        self.active_node = node.into();
    }

    /// Whether the thread is suspended pending human input
    pub fn awaiting_human(&self) -> bool {
        self.awaiting_human
    }

    pub fn set_awaiting_human(&mut self, awaiting: bool) {
        self.awaiting_human = awaiting;
    }
}

/// Shared handle to one thread's state.
///
/// The async mutex is held for a whole hop loop, serializing submits for the
/// same thread while leaving other threads untouched.
pub type ThreadHandle = Arc<Mutex<ThreadState>>;

/// Keeps every thread for the process lifetime, keyed by id.
///
/// The map lock is only held for lookup/insert; per-thread work happens under
/// the thread's own mutex, so distinct threads proceed fully concurrently.
#[derive(Default)]
pub struct ThreadStore {
    threads: RwLock<HashMap<ThreadId, ThreadHandle>>,
}

impl ThreadStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a thread, creating it positioned at the entry node if unseen.
    ///
    /// An unknown id is always a fresh thread, even if the caller believes it
    /// is resuming - there is no suspension on record to resume from.
    pub fn get_or_create(&self, id: &ThreadId, entry_node: &str) -> ThreadHandle {
        if let Some(handle) = self.threads.read().get(id) {
            return Arc::clone(handle);
        }

        let mut threads = self.threads.write();
        // Lost the race between read and write locks
        if let Some(handle) = threads.get(id) {
            return Arc::clone(handle);
        }

        info!(thread_id = %id, entry = entry_node, "Creating thread");
        let handle = Arc::new(Mutex::new(ThreadState::new(id.clone(), entry_node)));
        threads.insert(id.clone(), Arc::clone(&handle));
        handle
    }

    /// Fetch an existing thread
    pub fn get(&self, id: &ThreadId) -> Option<ThreadHandle> {
        self.threads.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.threads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.read().is_empty()
    }

    /// Ids of all known threads
    pub fn thread_ids(&self) -> Vec<ThreadId> {
        self.threads.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_thread_starts_at_entry() {
        let store = ThreadStore::new();
        let id = ThreadId::from("t1");

        let handle = store.get_or_create(&id, "intent_checker");
        let state = tokio_test::block_on(handle.lock());
        assert_eq!(state.active_node(), "intent_checker");
        assert!(state.is_empty());
        assert!(!state.awaiting_human());
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = ThreadStore::new();
        let id = ThreadId::from("t1");

        let a = store.get_or_create(&id, "entry");
        let b = store.get_or_create(&id, "entry");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_distinct_threads_are_independent() {
        let store = ThreadStore::new();

        let a = store.get_or_create(&ThreadId::from("a"), "entry");
        let b = store.get_or_create(&ThreadId::from("b"), "entry");

        tokio_test::block_on(a.lock()).push(Message::user("hello"));
        assert_eq!(tokio_test::block_on(a.lock()).len(), 1);
        assert_eq!(tokio_test::block_on(b.lock()).len(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_transcript_is_append_only() {
        let store = ThreadStore::new();
        let handle = store.get_or_create(&ThreadId::from("t"), "entry");
        let mut state = tokio_test::block_on(handle.lock());

        state.push(Message::user("first"));
        state.push(Message::agent("second"));
        state.push(Message::human_prompt("third"));

        let contents: Vec<&str> = state.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ThreadId::generate(), ThreadId::generate());
    }
}
