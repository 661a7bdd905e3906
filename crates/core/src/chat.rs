//! Concierge chat transcript and turn state.
//!
//! The transcript is append-only. A [`Concierge`] wraps it with a small state
//! machine so a visitor can only have one request in flight: a turn begins
//! with the visitor's message and ends when exactly one model reply has been
//! appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ChatRole;

/// Greeting shown as the first transcript entry.
pub const WELCOME_MESSAGE: &str = "Welcome to Lumina. I am your personal Style Concierge. Describe your outfit or occasion, and I'll find the perfect footwear for you.";

/// Transcript text recorded in place of an uploaded photo.
pub const IMAGE_PLACEHOLDER: &str = "[Uploaded an image of an outfit]";

/// Instruction sent alongside an uploaded outfit photo.
pub const IMAGE_INSTRUCTION: &str = "Analyze this outfit and recommend the perfect pair of shoes from our LUMINA collection. Describe why they match.";

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn now(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// A piece of content sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatPart {
    Text(String),
    Image { data: Vec<u8>, mime_type: String },
}

/// Append-only, chronological list of chat messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// A transcript holding only the welcome message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::now(ChatRole::Model, WELCOME_MESSAGE)],
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::now(ChatRole::User, text));
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::now(ChatRole::Model, text));
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; the welcome message is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Whether the concierge is waiting on the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Reasons a turn cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConciergeError {
    #[error("message is empty")]
    EmptyInput,
    #[error("a reply is still pending")]
    Busy,
}

/// Transcript plus turn state for one visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Concierge {
    transcript: Transcript,
    state: TurnState,
}

impl Concierge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub const fn state(&self) -> TurnState {
        self.state
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state == TurnState::AwaitingResponse
    }

    /// Start a text turn.
    ///
    /// # Errors
    ///
    /// `EmptyInput` for blank input and `Busy` while a reply is pending. In
    /// both cases the transcript is unchanged.
    pub fn begin_text(&mut self, input: &str) -> Result<Vec<ChatPart>, ConciergeError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ConciergeError::EmptyInput);
        }
        self.ensure_idle()?;

        self.transcript.push_user(text);
        self.state = TurnState::AwaitingResponse;
        Ok(vec![ChatPart::Text(text.to_string())])
    }

    /// Start an image turn. The transcript records a placeholder, not the
    /// image bytes.
    ///
    /// # Errors
    ///
    /// `EmptyInput` if `data` is empty, `Busy` while a reply is pending.
    pub fn begin_image(
        &mut self,
        data: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Result<Vec<ChatPart>, ConciergeError> {
        if data.is_empty() {
            return Err(ConciergeError::EmptyInput);
        }
        self.ensure_idle()?;

        self.transcript.push_user(IMAGE_PLACEHOLDER);
        self.state = TurnState::AwaitingResponse;
        Ok(vec![
            ChatPart::Image {
                data,
                mime_type: mime_type.into(),
            },
            ChatPart::Text(IMAGE_INSTRUCTION.to_string()),
        ])
    }

    /// Complete the pending turn with the model's reply.
    pub fn finish(&mut self, reply: impl Into<String>) {
        self.transcript.push_model(reply);
        self.state = TurnState::Idle;
    }

    const fn ensure_idle(&self) -> Result<(), ConciergeError> {
        match self.state {
            TurnState::Idle => Ok(()),
            TurnState::AwaitingResponse => Err(ConciergeError::Busy),
        }
    }
}
