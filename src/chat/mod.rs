//! Chat log sink
//!
//! The voice session core appends finished turns here; a streaming text
//! layer may additionally replace a provisional turn by id until its stream
//! ends. Turns are immutable once appended except for that replacement rule.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static TURN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Identifier for one chat turn
///
/// Drawn from a process-wide sequence counter, so turns flushed in rapid
/// succession never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub u64);

impl TurnId {
    pub fn next() -> Self {
        Self(TURN_SEQUENCE.fetch_add(1, Ordering::SeqCst))
    }
}

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One complete exchange unit in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: TurnId,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: TurnId::next(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// A system-style notice rendered in the model's column
    pub fn system(text: &str) -> Self {
        Self::new(Role::Model, format!("⚠️ System: {}", text))
    }
}

/// Persisted chat log the session core writes into
pub trait ChatLog: Send + Sync {
    /// Append a finished turn
    fn append(&self, turn: ChatTurn);

    /// Replace the text of a previously appended turn
    ///
    /// Used by streaming text replies; unknown ids are ignored.
    fn replace(&self, id: TurnId, text: String);

    /// Drop the whole conversation buffer
    fn clear(&self);

    /// Snapshot of all turns in append order
    fn turns(&self) -> Vec<ChatTurn>;
}

/// In-memory chat log
pub struct MemoryChatLog {
    turns: Mutex<Vec<ChatTurn>>,
}

impl MemoryChatLog {
    pub fn new() -> Self {
        Self {
            turns: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.turns.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog for MemoryChatLog {
    fn append(&self, turn: ChatTurn) {
        self.turns.lock().unwrap().push(turn);
    }

    fn replace(&self, id: TurnId, text: String) {
        let mut turns = self.turns.lock().unwrap();
        if let Some(turn) = turns.iter_mut().find(|t| t.id == id) {
            turn.text = text;
        }
    }

    fn clear(&self) {
        self.turns.lock().unwrap().clear();
    }

    fn turns(&self) -> Vec<ChatTurn> {
        self.turns.lock().unwrap().clone()
    }
}
