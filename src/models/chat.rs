//! Chat Models
//!
//! Recorded conversation turns and the result of one chat exchange.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use scratchpad_chat_llm::{Message, MessageRole, UsageStats};

/// A recorded conversation turn, as shown in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    /// Plain text of the turn (attachments are not part of the transcript)
    pub content: String,
    pub created_at: DateTime<Local>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            created_at: Local::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Local::now(),
        }
    }

    /// The turn as a single-part model message.
    pub fn to_message(&self) -> Message {
        Message::text(self.role, self.content.clone())
    }
}

/// Outcome of a successful chat exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Assistant reply text
    pub reply: String,
    /// Scratchpad names written from the reply, in write order
    pub saved: Vec<String>,
    /// Model that produced the reply
    pub model: String,
    pub usage: UsageStats,
}
