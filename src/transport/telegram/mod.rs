pub mod api;
pub mod types;

use tracing::{debug, info, warn};

use crate::commands::Reply;
use crate::error::Result;
use crate::output::Markup;
use crate::transport::{Inbound, Transport};

use api::TelegramApi;
use types::Update;

/// Telegram rejects longer text messages.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Long-polling Telegram Bot API transport.
pub struct TelegramTransport {
    api: TelegramApi,
    offset: Option<i64>,
    poll_timeout: u64,
    markup: Markup,
}

impl TelegramTransport {
    pub fn new(api: TelegramApi, poll_timeout: u64, markup: Markup) -> Self {
        info!(poll_timeout, "telegram transport ready");
        Self {
            api,
            offset: None,
            poll_timeout,
            markup,
        }
    }

    /// Advance the offset past every update and keep the text messages.
    fn collect(&mut self, updates: Vec<Update>) -> Vec<Inbound> {
        let mut inbound = Vec::with_capacity(updates.len());
        for update in updates {
            self.offset = Some(update.update_id + 1);
            let Some(msg) = update.message else {
                continue;
            };
            let (Some(from), Some(text)) = (msg.from, msg.text) else {
                continue;
            };
            if from.is_bot {
                debug!(chat_id = msg.chat.id, "ignoring message from a bot");
                continue;
            }
            inbound.push(Inbound {
                chat_id: msg.chat.id,
                message_id: Some(msg.message_id),
                account_id: from.id,
                text,
            });
        }
        inbound
    }
}

impl Transport for TelegramTransport {
    fn receive(&mut self) -> Result<Option<Vec<Inbound>>> {
        let updates = self.api.get_updates(self.offset, self.poll_timeout)?;
        Ok(Some(self.collect(updates)))
    }

    fn send(&mut self, to: &Inbound, reply: &Reply) -> Result<()> {
        match reply {
            Reply::Text(text) => {
                let (body, parse_mode) = outgoing_text(text, self.markup);
                for chunk in split_message(&body, MAX_MESSAGE_CHARS) {
                    self.api
                        .send_message(to.chat_id, &chunk, parse_mode, to.message_id)?;
                }
            }
            Reply::Photo { file_name, bytes } => {
                self.api
                    .send_photo(to.chat_id, file_name, bytes.clone(), to.message_id)?;
            }
        }
        Ok(())
    }
}

/// Text and `parse_mode` to send. A line over the message limit has to be
/// cut, and a cut could land inside a tag or entity, so such replies go
/// out without markup.
fn outgoing_text(text: &str, markup: Markup) -> (String, Option<&'static str>) {
    let overlong = text.lines().any(|l| l.chars().count() > MAX_MESSAGE_CHARS);
    if overlong && markup == Markup::Html {
        warn!("reply has an overlong line, sending it as plain text");
        return (strip_html(text), None);
    }
    (text.to_string(), markup.parse_mode())
}

/// Drop tags and decode the entities produced by [`Markup::escape`].
fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Split a long reply at line boundaries into chunks of at most `limit`
/// characters. A single line longer than the limit is cut.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for line in text.lines() {
        let mut line: String = line.to_string();
        let mut line_len = line.chars().count();
        if line_len > limit {
            line = line.chars().take(limit).collect();
            line_len = limit;
        }
        let extra = if current.is_empty() { line_len } else { line_len + 1 };
        if current_len + extra > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(&line);
        current_len += line_len;
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn collect_keeps_text_messages_and_advances_offset() {
        let api = TelegramApi::with_base_url("t", "http://localhost:1", 1).unwrap();
        let mut t = TelegramTransport::new(api, 1, Markup::Html);
        let updates = vec![
            update(
                r#"{"update_id": 10, "message": {"message_id": 1,
                    "from": {"id": 42, "is_bot": false}, "chat": {"id": 42},
                    "text": "/list"}}"#,
            ),
            update(r#"{"update_id": 11, "message": {"message_id": 2, "chat": {"id": 42}}}"#),
            update(
                r#"{"update_id": 12, "message": {"message_id": 3,
                    "from": {"id": 7, "is_bot": true}, "chat": {"id": 42},
                    "text": "/delete 1"}}"#,
            ),
        ];
        let inbound = t.collect(updates);
        assert_eq!(
            inbound,
            vec![Inbound {
                chat_id: 42,
                message_id: Some(1),
                account_id: 42,
                text: "/list".into(),
            }]
        );
        assert_eq!(t.offset, Some(13));
    }

    #[test]
    fn short_messages_are_not_split() {
        assert_eq!(split_message("a\nb", 10), vec!["a\nb"]);
        assert_eq!(split_message("", 10), vec![""]);
    }

    #[test]
    fn long_messages_split_on_lines() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_message(text, 9), vec!["aaaa\nbbbb", "cccc"]);
        assert_eq!(split_message(text, 4), vec!["aaaa", "bbbb", "cccc"]);
    }

    #[test]
    fn html_with_an_overlong_line_goes_out_plain() {
        let name = "x".repeat(MAX_MESSAGE_CHARS);
        let text = format!("Your tasks:\n1. a &amp; b <i>(5m)</i>\n2. {name} <i>(0m)</i>\n");
        let (body, mode) = outgoing_text(&text, Markup::Html);
        assert_eq!(mode, None);
        assert!(body.starts_with("Your tasks:\n1. a & b (5m)\n2. xxx"));
        for chunk in split_message(&body, MAX_MESSAGE_CHARS) {
            assert!(!chunk.contains('<'));
            assert!(chunk.chars().count() <= MAX_MESSAGE_CHARS);
        }
    }

    #[test]
    fn short_html_keeps_its_markup() {
        let (body, mode) = outgoing_text("Plan for <b>2024-03-01</b> updated.", Markup::Html);
        assert_eq!(body, "Plan for <b>2024-03-01</b> updated.");
        assert_eq!(mode, Some("HTML"));
    }

    #[test]
    fn overlong_line_is_cut() {
        assert_eq!(split_message("abcdefgh", 5), vec!["abcde"]);
    }
}
