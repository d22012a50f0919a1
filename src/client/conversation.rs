// Multi-turn transcript held by the caller
// Author: kelexine (https://github.com/kelexine)

use crate::models::ChatMessage;

/// Entries replayed to the provider when multi-turn mode is on.
pub const MAX_REPLAYED_TURNS: usize = 6;

/// Session transcript, bounded to the entries that can still be replayed.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    entries: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent [`MAX_REPLAYED_TURNS`] entries, oldest first.
    pub fn recent(&self) -> &[ChatMessage] {
        let start = self.entries.len().saturating_sub(MAX_REPLAYED_TURNS);
        &self.entries[start..]
    }

    /// Record a user turn and the reply shown for it.
    pub fn record(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.entries.push(ChatMessage::user(user));
        self.entries.push(ChatMessage::assistant(reply));

        let excess = self.entries.len().saturating_sub(MAX_REPLAYED_TURNS);
        self.entries.drain(..excess);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
