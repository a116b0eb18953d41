//! Conversation transcript and its history window.

use super::entities::{Message, Role};

/// Counts shown by the `/history` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySummary {
    /// User and assistant messages
    pub dialogue: usize,
    /// Tool result messages
    pub tool_results: usize,
    /// Every entry, system message included
    pub total: usize,
}

/// Ordered transcript of one agent session.
///
/// Element 0 is always the system message. It is never evicted by
/// [`trim`](Self::trim) and only replaced by [`reset`](Self::reset).
///
/// # History window
///
/// `max_history` counts message *pairs*. Once the transcript holds more than
/// `max_history * 2 + 1` entries, trimming keeps the system message and the
/// newest `max_history * 2` entries. Tool results left at the head of the
/// window without the assistant message that requested them are dropped too.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    max_history: usize,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>, max_history: usize) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
            max_history,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when only the system message is present.
    pub fn is_empty(&self) -> bool {
        self.messages.len() <= 1
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a message. System messages are rejected: there is exactly one.
    pub fn push(&mut self, message: Message) {
        if message.role == Role::System {
            return;
        }
        self.messages.push(message);
    }

    /// Drop everything except the system message.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Enforce the history window. Returns how many messages were evicted.
    pub fn trim(&mut self) -> usize {
        let window = self.max_history.saturating_mul(2);
        if self.messages.len() <= window + 1 {
            return 0;
        }

        let mut start = self.messages.len() - window;
        while start < self.messages.len() && self.messages[start].role == Role::Tool {
            start += 1;
        }
        let removed = start - 1;
        self.messages.drain(1..start);
        removed
    }

    pub fn summary(&self) -> HistorySummary {
        let count = |pred: fn(Role) -> bool| self.messages.iter().filter(|m| pred(m.role)).count();
        HistorySummary {
            dialogue: count(|r| matches!(r, Role::User | Role::Assistant)),
            tool_results: count(|r| r == Role::Tool),
            total: self.messages.len(),
        }
    }
}
