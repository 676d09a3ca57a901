//! Serde types for the Telegram Bot API.
//!
//! Only the fields the bot reads are deserialized; unknown fields are
//! ignored.

use serde::Deserialize;

/// Generic Telegram API response wrapper.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub description: Option<String>,
    pub result: Option<T>,
}

/// A Telegram Update object from `getUpdates`.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Sent message result (we only need message_id).
#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}
