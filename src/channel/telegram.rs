//! Telegram Bot API notifier using raw reqwest (no framework).
//!
//! Sends plain-text messages via `sendMessage` to one fixed chat.

use async_trait::async_trait;
use serde::Deserialize;

use super::Notifier;
use crate::error::WatchError;

/// Maximum message length for Telegram (we chunk below this).
const MAX_MESSAGE_LEN: usize = 4000;

/// Sends notifications to a single Telegram chat.
pub struct TelegramNotifier {
    api_base: String,
    bot_token: String,
    chat_id: i64,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: i64,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id,
            client,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    async fn send_chunk(&self, chunk: &str) -> Result<(), WatchError> {
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": chunk,
            }))
            .send()
            .await
            // Strip the URL: it embeds the bot token.
            .map_err(|e| WatchError::Delivery(e.without_url().to_string()))?;

        let status = resp.status();
        let body: TgResponse = resp.json().await.map_err(|_| {
            WatchError::Delivery(format!(
                "unexpected reply from Telegram (HTTP {})",
                status.as_u16()
            ))
        })?;

        if !body.ok {
            let desc = body
                .description
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(WatchError::Delivery(desc));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    /// Chunks are sent in order and the first failure aborts the rest. A
    /// partially delivered message counts as failed, so the caller retries it
    /// whole and already-sent chunks are sent again.
    async fn notify(&self, text: &str) -> Result<(), WatchError> {
        for chunk in chunk_message(text) {
            self.send_chunk(chunk).await?;
        }
        Ok(())
    }
}

/// Split a message into chunks that fit within Telegram's limit.
fn chunk_message(text: &str) -> Vec<&str> {
    if text.len() <= MAX_MESSAGE_LEN {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= MAX_MESSAGE_LEN {
            chunks.push(remaining);
            break;
        }

        // Largest char boundary within the limit.
        let mut limit = MAX_MESSAGE_LEN;
        while !remaining.is_char_boundary(limit) {
            limit -= 1;
        }

        // Prefer splitting at a newline.
        let split_at = match remaining[..limit].rfind('\n') {
            Some(0) | None => limit,
            Some(idx) => idx,
        };

        let (chunk, rest) = remaining.split_at(split_at);
        chunks.push(chunk);
        remaining = rest.strip_prefix('\n').unwrap_or(rest);
    }

    chunks
}
