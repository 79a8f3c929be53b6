//! Translation between the caller-visible history and completion messages.
//!
//! Callers keep the conversation themselves as a flat list of human/ai turns
//! and send it back with every request. Each request is expanded into a fresh
//! message sequence for the completion endpoint, and the finished turn is
//! appended to a copy of the caller's history.

use serde::{Deserialize, Serialize};

use crate::core_types::Message;

pub const SYSTEM_PROMPT: &str = r#"
You are a smart Weather AI inside a chat system.

RULES:
- When user asks for forecast or future weather, call tool with type="forecast".
- When user asks for current weather, call tool with type="current".
- Answer based only on weather context.
- You may give simple weather-related lifestyle suggestions if and only if user asks for them.
- Do NOT ask the user to ask something else or say things like "just ask".
- Do NOT ask unnecessary clarification questions unless no city has been mentioned at all.
- Remember the last city unless the user changes it.
- Keep responses short and direct.
- Do NOT talk about anything unrelated to weather.
"#;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    Human,
    #[serde(other)]
    Ai,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Turn {
    #[serde(rename = "type")]
    pub kind: TurnKind,
    pub text: String,
}

impl Turn {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            kind: TurnKind::Human,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            kind: TurnKind::Ai,
            text: text.into(),
        }
    }

    fn to_message(&self) -> Message {
        match self.kind {
            TurnKind::Human => Message::user(self.text.clone()),
            TurnKind::Ai => Message::assistant(self.text.clone()),
        }
    }
}

/// Builds the message sequence for one request: the system prompt, the
/// caller's history in order, then the new user input.
pub fn expand_history(system_prompt: &str, history: &[Turn], user_text: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend(history.iter().map(Turn::to_message));
    messages.push(Message::user(user_text));
    messages
}

/// Returns a new history with the finished exchange appended. The input is
/// left untouched.
pub fn append_turn(history: &[Turn], user_text: &str, reply: &str) -> Vec<Turn> {
    let mut updated = Vec::with_capacity(history.len() + 2);
    updated.extend_from_slice(history);
    updated.push(Turn::human(user_text));
    updated.push(Turn::ai(reply));
    updated
}
