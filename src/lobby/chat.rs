//! Lobby chat log

use super::{generate_id, Lobby, ValidationError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Author name reserved for lobby notices
pub const SYSTEM_AUTHOR: &str = "System";

/// Whether a player name collides with the notice author, ignoring case
pub fn is_reserved_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(SYSTEM_AUTHOR)
}

/// Display identity attached to a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAuthor {
    pub full_name: String,
    pub avatar: String,
}

impl ChatAuthor {
    pub fn new(full_name: impl Into<String>, avatar: impl Into<String>) -> Self {
        ChatAuthor {
            full_name: full_name.into(),
            avatar: avatar.into(),
        }
    }

    pub fn system() -> Self {
        ChatAuthor::new(SYSTEM_AUTHOR, "")
    }

    pub fn is_system(&self) -> bool {
        self.full_name == SYSTEM_AUTHOR
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user: ChatAuthor,
    pub text: String,
    /// Wall-clock time of posting, e.g. `05:30 PM`
    pub timestamp: String,
}

impl ChatMessage {
    pub fn is_system(&self) -> bool {
        self.user.is_system()
    }
}

/// Append a user message to the lobby chat.
///
/// Whitespace-only text is rejected. Membership is checked by the caller.
pub fn append_message(
    lobby: &mut Lobby,
    author: ChatAuthor,
    text: &str,
    now: NaiveDateTime,
) -> Result<ChatMessage, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(push(lobby, author, text.to_string(), now))
}

/// Append a notice from the system author.
pub fn post_system_message(lobby: &mut Lobby, text: &str, now: NaiveDateTime) -> ChatMessage {
    push(lobby, ChatAuthor::system(), text.to_string(), now)
}

fn push(lobby: &mut Lobby, user: ChatAuthor, text: String, now: NaiveDateTime) -> ChatMessage {
    let message = ChatMessage {
        id: generate_id("cm"),
        user,
        text,
        timestamp: format_timestamp(now),
    };
    lobby.chat.push(message.clone());
    message
}

/// Hour and minute on a 12-hour clock
pub fn format_timestamp(now: NaiveDateTime) -> String {
    now.format("%I:%M %p").to_string()
}
