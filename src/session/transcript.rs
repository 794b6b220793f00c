use tracing::debug;

use crate::chat::{ChatLog, ChatTurn, Role};

/// Placeholder text for a turn side that produced no transcription
pub const EMPTY_TURN_PLACEHOLDER: &str = "...";

/// Accumulates partial transcription text for the current turn
///
/// Both buffers are scoped to one turn: they grow as deltas arrive and are
/// flushed into the chat log exactly once when the turn completes.
#[derive(Debug, Default)]
pub struct TranscriptSync {
    user: String,
    model: String,
}

impl TranscriptSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment of the user's transcription
    pub fn push_user(&mut self, delta: &str) {
        self.user.push_str(delta);
    }

    /// Append a fragment of the model's transcription
    pub fn push_model(&mut self, delta: &str) {
        self.model.push_str(delta);
    }

    /// Flush the completed turn into the chat log and reset both buffers
    ///
    /// Always appends exactly one user turn and one model turn; an empty
    /// side becomes the placeholder so a turn is never silently dropped.
    pub fn flush(&mut self, chat: &dyn ChatLog) {
        let user_text = std::mem::take(&mut self.user);
        let model_text = std::mem::take(&mut self.model);

        debug!(
            "Flushing turn (user: {} chars, model: {} chars)",
            user_text.len(),
            model_text.len()
        );

        chat.append(ChatTurn::new(
            Role::User,
            non_empty_or_placeholder(user_text),
        ));
        chat.append(ChatTurn::new(
            Role::Model,
            non_empty_or_placeholder(model_text),
        ));
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.model.is_empty()
    }
}

fn non_empty_or_placeholder(text: String) -> String {
    if text.is_empty() {
        EMPTY_TURN_PLACEHOLDER.to_string()
    } else {
        text
    }
}
