//! Raw HTTP calls to the Telegram Bot API.
//!
//! Wraps a blocking reqwest client for `getUpdates`, `sendMessage` and
//! `sendPhoto`.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{BotError, Result};

use super::types::{ApiResponse, SentMessage, Update};

/// Slack on top of the long-poll timeout before the HTTP request gives up.
const REQUEST_SLACK: Duration = Duration::from_secs(10);

pub struct TelegramApi {
    client: Client,
    base_url: String,
}

impl TelegramApi {
    pub fn new(bot_token: &str, poll_timeout: u64) -> Result<Self> {
        Self::with_base_url(bot_token, "https://api.telegram.org", poll_timeout)
    }

    /// Create a client against a custom base URL (for testing).
    pub fn with_base_url(bot_token: &str, base_url: &str, poll_timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout) + REQUEST_SLACK)
            .build()?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{}", base_url.trim_end_matches('/'), bot_token),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    fn unwrap_response<T: DeserializeOwned>(
        method: &str,
        resp: reqwest::blocking::Response,
    ) -> Result<Option<T>> {
        let api_resp: ApiResponse<T> = resp.json()?;
        if !api_resp.ok {
            let desc = api_resp.description.unwrap_or_default();
            warn!(method, "telegram call failed: {desc}");
            return Err(BotError::Telegram(desc));
        }
        Ok(api_resp.result)
    }

    /// Long-poll for new updates.
    ///
    /// `offset` should be `last_update_id + 1` to acknowledge what was
    /// already received.
    pub fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>> {
        let mut body = json!({
            "timeout": timeout,
            "allowed_updates": ["message"],
        });
        if let Some(off) = offset {
            body["offset"] = json!(off);
        }

        let resp = self
            .client
            .post(self.method_url("getUpdates"))
            .json(&body)
            .send()?;
        Ok(Self::unwrap_response::<Vec<Update>>("getUpdates", resp)?.unwrap_or_default())
    }

    /// Send a text message, optionally as a reply. Returns the new message id.
    pub fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<&str>,
        reply_to: Option<i64>,
    ) -> Result<i64> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = json!(mode);
        }
        if let Some(message_id) = reply_to {
            body["reply_parameters"] = json!({
                "message_id": message_id,
                "allow_sending_without_reply": true,
            });
        }

        debug!("sendMessage to chat_id={chat_id}");
        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()?;
        let sent = Self::unwrap_response::<SentMessage>("sendMessage", resp)?;
        Ok(sent.map(|m| m.message_id).unwrap_or(0))
    }

    /// Upload a photo as multipart form data.
    pub fn send_photo(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        reply_to: Option<i64>,
    ) -> Result<i64> {
        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", Part::bytes(bytes).file_name(file_name.to_string()));
        if let Some(message_id) = reply_to {
            let params = json!({
                "message_id": message_id,
                "allow_sending_without_reply": true,
            });
            form = form.text("reply_parameters", serde_json::to_string(&params)?);
        }

        debug!("sendPhoto to chat_id={chat_id}");
        let resp = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()?;
        let sent = Self::unwrap_response::<SentMessage>("sendPhoto", resp)?;
        Ok(sent.map(|m| m.message_id).unwrap_or(0))
    }
}
