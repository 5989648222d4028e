//! Conversation memory
//!
//! [`MessageWindowChatMemory`] keeps the most recent messages of one
//! conversation; [`ChatMemoryStore`] maps conversation ids to their windows.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::domain::models::{ChatMessage, Role};

/// Conversation id used when the caller does not supply one.
pub const DEFAULT_CONVERSATION_ID: &str = "default";

/// Sliding window over the most recent messages.
///
/// Holds at most `max_messages` messages. When full, the oldest non-system
/// message is evicted first; a system message is never evicted and counts
/// toward the capacity. Evicting an assistant tool-request message also drops
/// the tool results that answered it.
#[derive(Debug, Clone)]
pub struct MessageWindowChatMemory {
    max_messages: usize,
    messages: VecDeque<ChatMessage>,
}

impl MessageWindowChatMemory {
    pub fn with_max_messages(max_messages: usize) -> Self {
        Self {
            max_messages: max_messages.max(1),
            messages: VecDeque::new(),
        }
    }

    /// Append a message, evicting the oldest ones if over capacity.
    ///
    /// A new system message replaces the existing one.
    pub fn add(&mut self, message: ChatMessage) {
        if message.role == Role::System {
            if let Some(pos) = self.messages.iter().position(|m| m.role == Role::System) {
                if self.messages[pos] == message {
                    return;
                }
                self.messages.remove(pos);
            }
            self.messages.push_front(message);
        } else {
            self.messages.push_back(message);
        }
        self.evict();
    }

    fn evict(&mut self) {
        while self.messages.len() > self.max_messages {
            let Some(pos) = self.messages.iter().position(|m| m.role != Role::System) else {
                return;
            };
            let Some(evicted) = self.messages.remove(pos) else {
                return;
            };
            if evicted.has_tool_requests() {
                while self
                    .messages
                    .get(pos)
                    .is_some_and(|m| m.role == Role::Tool)
                {
                    self.messages.remove(pos);
                }
            }
        }
    }

    /// Messages in conversation order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.max_messages
    }
}

/// One conversation: its window plus a turn lock.
///
/// The turn lock serializes whole chat turns (append user message, call the
/// model, append the reply) on the same conversation. The window's own lock
/// is only held for individual reads and writes.
#[derive(Debug)]
pub struct Conversation {
    memory: Mutex<MessageWindowChatMemory>,
    turn: tokio::sync::Mutex<()>,
}

impl Conversation {
    pub fn new(max_messages: usize) -> Self {
        Self {
            memory: Mutex::new(MessageWindowChatMemory::with_max_messages(max_messages)),
            turn: tokio::sync::Mutex::new(()),
        }
    }

    /// Wait for exclusive use of this conversation for one turn.
    pub async fn begin_turn(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.turn.lock().await
    }

    /// Append a message and return the resulting size.
    pub fn add(&self, message: ChatMessage) -> usize {
        let mut memory = self.memory.lock();
        memory.add(message);
        memory.len()
    }

    /// Append a message and return a snapshot of the window after it.
    pub fn add_and_snapshot(&self, message: ChatMessage) -> Vec<ChatMessage> {
        let mut memory = self.memory.lock();
        memory.add(message);
        memory.messages()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.memory.lock().messages()
    }

    pub fn len(&self) -> usize {
        self.memory.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.lock().is_empty()
    }

    pub fn clear(&self) {
        self.memory.lock().clear();
    }
}

/// Per-conversation memories, created on first use.
///
/// Conversations never contend with each other. Turns on one conversation
/// run one at a time; reads such as [`size`](Self::size) do not wait for an
/// in-flight turn.
#[derive(Debug)]
pub struct ChatMemoryStore {
    max_messages: usize,
    conversations: Mutex<HashMap<String, Arc<Conversation>>>,
}

impl ChatMemoryStore {
    pub fn new(max_messages: usize) -> Self {
        Self {
            max_messages,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// The conversation for `conversation_id`, created empty if absent.
    pub fn conversation(&self, conversation_id: &str) -> Arc<Conversation> {
        let mut conversations = self.conversations.lock();
        Arc::clone(
            conversations
                .entry(conversation_id.to_string())
                .or_insert_with(|| Arc::new(Conversation::new(self.max_messages))),
        )
    }

    fn existing(&self, conversation_id: &str) -> Option<Arc<Conversation>> {
        self.conversations.lock().get(conversation_id).cloned()
    }

    /// Append a message and return the resulting size.
    pub fn add(&self, conversation_id: &str, message: ChatMessage) -> usize {
        self.conversation(conversation_id).add(message)
    }

    pub fn messages(&self, conversation_id: &str) -> Vec<ChatMessage> {
        self.existing(conversation_id)
            .map(|conversation| conversation.messages())
            .unwrap_or_default()
    }

    /// Number of stored messages; 0 for unknown conversations.
    pub fn size(&self, conversation_id: &str) -> usize {
        self.existing(conversation_id)
            .map_or(0, |conversation| conversation.len())
    }

    /// Forget a conversation entirely. A turn still running on it finishes
    /// against the detached, emptied memory.
    pub fn clear(&self, conversation_id: &str) {
        let removed = self.conversations.lock().remove(conversation_id);
        if let Some(conversation) = removed {
            conversation.clear();
        }
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.lock().len()
    }
}
