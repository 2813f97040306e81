//! Notification fan-out.
//!
//! A [`Messenger`] delivers each message to every registered [`Sink`]
//! in registration order. No sink's failure may prevent delivery to any
//! other sink: every error is caught here and reported to the log, and
//! the fan-out itself is infallible.

use async_trait::async_trait;
use telegram::{ParseMode, TelegramClient};
use tracing::{error, info};

use crate::error::NotifyError;

/// A notification delivery target.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn send(&self, message: &str, channel: Option<&str>) -> Result<(), NotifyError>;

    /// Name used when reporting a delivery failure.
    fn name(&self) -> &str;
}

/// Fan-out over all registered sinks.
pub struct Messenger {
    sinks: Vec<Box<dyn Sink>>,
}

impl Messenger {
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { sinks }
    }

    /// Deliver to every sink in registration order, isolating failures.
    pub async fn send(&self, message: &str, channel: Option<&str>) {
        for sink in &self.sinks {
            if let Err(err) = sink.send(message, channel).await {
                error!(sink = sink.name(), error = %err, "notification delivery failed");
            }
        }
    }
}

/// Sink writing messages to the structured log.
pub struct TracingSink;

#[async_trait]
impl Sink for TracingSink {
    async fn send(&self, message: &str, channel: Option<&str>) -> Result<(), NotifyError> {
        match channel {
            Some(channel) => info!("[{channel}] {message}"),
            None => info!("{message}"),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

/// Sink posting messages to a Telegram channel as MarkdownV2.
///
/// Credentials are optional at construction; a missing token or channel
/// fails the individual send, never startup.
pub struct TelegramSink {
    token: Option<String>,
    default_channel: Option<String>,
}

impl TelegramSink {
    pub fn new(token: Option<String>, default_channel: Option<String>) -> Self {
        Self {
            token,
            default_channel,
        }
    }
}

#[async_trait]
impl Sink for TelegramSink {
    async fn send(&self, message: &str, channel: Option<&str>) -> Result<(), NotifyError> {
        let token = self.token.as_deref().ok_or(NotifyError::MissingToken)?;
        let channel = channel
            .or(self.default_channel.as_deref())
            .ok_or(NotifyError::MissingChannel)?;

        let text = escape_markdown_v2(message);
        TelegramClient::new(token)
            .send_message(&format!("@{channel}"), &text, Some(ParseMode::MarkdownV2))
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// Escape the characters Telegram's MarkdownV2 mode rejects unescaped
/// in our rendered messages: `.` `(` `)` `-`.
fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if matches!(ch, '.' | '(' | ')' | '-') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingSink, RecordingSink};

    #[test]
    fn escapes_reserved_markdown_characters() {
        assert_eq!(
            escape_markdown_v2("RTX 3080 (10GB) - 699.00"),
            "RTX 3080 \\(10GB\\) \\- 699\\.00"
        );
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(escape_markdown_v2("59 990 ₽"), "59 990 ₽");
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_later_sinks() {
        let recording = RecordingSink::new();
        let messenger = Messenger::new(vec![
            Box::new(FailingSink),
            Box::new(recording.clone()),
        ]);

        messenger.send("RTX 3080 in stock", None).await;

        let delivered = recording.messages();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, "RTX 3080 in stock");
    }

    #[tokio::test]
    async fn delivers_to_sinks_in_registration_order() {
        let first = RecordingSink::new();
        let second = RecordingSink::new();
        let messenger = Messenger::new(vec![Box::new(first.clone()), Box::new(second.clone())]);

        messenger.send("hello", Some("deals")).await;

        assert_eq!(first.messages().len(), 1);
        assert_eq!(second.messages().len(), 1);
        assert_eq!(first.messages()[0].1.as_deref(), Some("deals"));
    }

    #[tokio::test]
    async fn telegram_sink_without_token_fails_lazily() {
        let sink = TelegramSink::new(None, Some("deals".to_string()));
        let error = sink.send("hi", None).await.unwrap_err();
        assert!(matches!(error, NotifyError::MissingToken));
    }

    #[tokio::test]
    async fn telegram_sink_without_any_channel_fails() {
        let sink = TelegramSink::new(Some("token".to_string()), None);
        let error = sink.send("hi", None).await.unwrap_err();
        assert!(matches!(error, NotifyError::MissingChannel));
    }
}
