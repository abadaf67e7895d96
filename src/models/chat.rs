// src/models/chat.rs
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::default_language;
use crate::openai_client::ChatMessage;

/// Reply the chat UI renders when the request fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, rename = "chatHistory")]
    pub chat_history: Vec<HistoryEntry>,
}

/// One prior turn, supplied by the caller oldest-first. The caller-held
/// history is the only conversation memory; nothing is stored server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

impl From<HistoryEntry> for ChatMessage {
    fn from(entry: HistoryEntry) -> Self {
        ChatMessage {
            role: entry.role,
            content: entry.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub language: String,
    pub timestamp: String,
}

impl ChatReply {
    pub fn new(reply: String, language: String) -> Self {
        Self {
            reply,
            language,
            timestamp: now_iso8601(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatFailure {
    pub error: String,
    pub reply: String,
    pub timestamp: String,
}

impl ChatFailure {
    pub fn new(error: String) -> Self {
        Self {
            error,
            reply: FALLBACK_REPLY.to_string(),
            timestamp: now_iso8601(),
        }
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
