//! Conversation model shared by the assistant service and its clients.
//!
//! A [`Transcript`] is an ordered, append-only list of [`Turn`]s. Roles are a
//! closed set, so a transcript arriving over the wire either deserializes into
//! valid turns or is rejected at the boundary. [`ChatPanel`] wraps a
//! transcript with the little bit of UI state the chat widget needs: whether
//! it is open, the draft being typed, and whether a reply is in flight.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// TURNS
// =============================================================================

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The site visitor.
    User,
    /// The clinic assistant (model replies and fallback messages alike).
    Assistant,
}

/// One entry in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    /// Milliseconds since Unix epoch at append time.
    pub timestamp_ms: i64,
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

/// Reasons a list of turns is not a valid transcript.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    #[error("turn {index} has no text")]
    EmptyTurn { index: usize },
    #[error("turn {index} is timestamped before the turn preceding it")]
    OutOfOrder { index: usize },
}

/// Ordered conversation history. Turns are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Start a session with the assistant's opening line already in place.
    #[must_use]
    pub fn with_greeting(greeting: &str) -> Self {
        let mut transcript = Self::new();
        transcript.push(Role::Assistant, greeting);
        transcript
    }

    /// Append a turn stamped with the current time.
    ///
    /// The stamp is never earlier than the previous turn's, so a clock step
    /// backwards cannot reorder the transcript.
    pub fn push(&mut self, role: Role, text: impl Into<String>) -> &Turn {
        self.push_at(role, text, now_ms())
    }

    pub(crate) fn push_at(&mut self, role: Role, text: impl Into<String>, timestamp_ms: i64) -> &Turn {
        let floor = self.turns.last().map_or(timestamp_ms, |t| t.timestamp_ms);
        self.turns.push(Turn { role, text: text.into(), timestamp_ms: timestamp_ms.max(floor) });
        &self.turns[self.turns.len() - 1]
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl TryFrom<Vec<Turn>> for Transcript {
    type Error = TranscriptError;

    fn try_from(turns: Vec<Turn>) -> Result<Self, Self::Error> {
        for (index, turn) in turns.iter().enumerate() {
            if turn.text.trim().is_empty() {
                return Err(TranscriptError::EmptyTurn { index });
            }
            if index > 0 && turn.timestamp_ms < turns[index - 1].timestamp_ms {
                return Err(TranscriptError::OutOfOrder { index });
            }
        }
        Ok(Self { turns })
    }
}

impl From<Transcript> for Vec<Turn> {
    fn from(transcript: Transcript) -> Self {
        transcript.turns
    }
}

// =============================================================================
// CHAT PANEL
// =============================================================================

/// State behind the floating chat widget.
#[derive(Debug, Clone)]
pub struct ChatPanel {
    open: bool,
    draft: String,
    pending: Option<String>,
    transcript: Transcript,
}

impl ChatPanel {
    #[must_use]
    pub fn new(greeting: &str) -> Self {
        Self { open: false, draft: String::new(), pending: None, transcript: Transcript::with_greeting(greeting) }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether a reply is in flight. Input is disabled while this is set.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The message awaiting a reply, shown under the transcript while loading.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Take the draft for sending.
    ///
    /// Returns `None` for a blank draft or while a previous send is still in
    /// flight. Otherwise the trimmed message is returned, the draft cleared,
    /// and the panel enters the loading state.
    pub fn begin_send(&mut self) -> Option<String> {
        if self.pending.is_some() {
            return None;
        }
        let message = self.draft.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();
        self.draft.clear();
        self.pending = Some(message.clone());
        Some(message)
    }

    /// Adopt the transcript returned by the assistant and leave loading.
    pub fn finish(&mut self, transcript: Transcript) {
        self.pending = None;
        self.transcript = transcript;
    }

    /// The request never produced a transcript; record the message with a
    /// local fallback reply instead.
    pub fn fail(&mut self, fallback: &str) {
        if let Some(message) = self.pending.take() {
            self.transcript.push(Role::User, message);
            self.transcript.push(Role::Assistant, fallback);
        }
    }

    /// The service refused the message itself. Nothing is recorded; the
    /// message goes back into the draft so it can be edited.
    pub fn reject(&mut self) {
        if let Some(message) = self.pending.take() {
            self.draft = message;
        }
    }
}
