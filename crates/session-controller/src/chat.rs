//! Chat channel state.
//!
//! An append-only, arrival-ordered message log. Sends are echoed locally
//! before transmission (no server round-trip for local echo); receipt of a
//! remote payload appends with the local receipt timestamp and emits a
//! notification cue. Messages are never mutated or deleted, and no
//! cross-sender reordering or deduplication is performed.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::events::{EventSource, Subscription};
use crate::transport::AttendeeId;

/// One chat log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_id: AttendeeId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Trim input and reject empty/whitespace-only messages.
#[must_use]
pub fn normalize(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The ordered chat log plus its incoming-message notification cue.
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    incoming: EventSource<ChatMessage>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            incoming: EventSource::new(),
        }
    }

    /// Append a locally-originated message (already normalized).
    pub fn append_local(&mut self, self_id: &AttendeeId, text: String) {
        self.messages.push(ChatMessage {
            sender_id: self_id.clone(),
            text,
            timestamp: Utc::now(),
        });
    }

    /// Append a received payload and fire the notification cue.
    pub fn append_remote(&mut self, sender_id: AttendeeId, payload: &Bytes) {
        let message = ChatMessage {
            sender_id,
            text: String::from_utf8_lossy(payload).into_owned(),
            timestamp: Utc::now(),
        };
        self.messages.push(message.clone());
        self.incoming.emit(message);
    }

    /// Notification cue for received messages (e.g. a chat sound).
    pub fn subscribe_incoming<F>(&self, handler: F) -> Subscription
    where
        F: Fn(ChatMessage) + Send + Sync + 'static,
    {
        self.incoming.subscribe(handler)
    }

    /// Shared handle to the cue source, usable after the log moves into
    /// the session actor.
    #[must_use]
    pub fn incoming_source(&self) -> EventSource<ChatMessage> {
        self.incoming.clone()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
