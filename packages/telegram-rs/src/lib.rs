//! Minimal Telegram Bot API client.
//!
//! Covers the single call the watcher needs: `sendMessage`.

pub mod models;

use reqwest::Client;
use thiserror::Error;

pub use models::{ApiResponse, Message, ParseMode, SendMessageRequest};

const API_BASE: &str = "https://api.telegram.org";

/// Errors returned by Bot API calls.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP transport failed
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Bot API rejected the request
    #[error("telegram API error {code}: {description}")]
    Api { code: i64, description: String },
}

/// Result type alias for Bot API calls.
pub type Result<T> = std::result::Result<T, TelegramError>;

#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    token: String,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
        }
    }

    /// Send a text message to a chat. `chat_id` is a numeric id or a
    /// public `@channelname`.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<Message> {
        let url = format!("{API_BASE}/bot{}/sendMessage", self.token);
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: parse_mode.map(|mode| mode.as_str()),
        };

        let response = self.client.post(url).json(&request).send().await?;
        let body: ApiResponse<Message> = response.json().await?;

        if !body.ok {
            return Err(TelegramError::Api {
                code: body.error_code.unwrap_or_default(),
                description: body
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        body.result.ok_or(TelegramError::Api {
            code: 0,
            description: "ok response without a result".to_string(),
        })
    }
}
