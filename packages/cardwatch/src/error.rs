//! Typed errors for the watcher pipeline.
//!
//! Uses `thiserror` for library errors; `anyhow` is reserved for the
//! binary entry point.

use thiserror::Error;

/// Errors raised while enumerating or parsing product cards.
///
/// Extraction errors are fatal to the whole poll cycle: a single
/// malformed card aborts the cycle and propagates out of the run loop.
/// Transient *absence* of a card is tolerated by the tracker's
/// missing-count hysteresis instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A required element was not found under a card
    #[error("required element not found: {selector}")]
    MissingElement { selector: String },

    /// A price cell's markup did not reduce to a number
    #[error("unparsable price markup: {raw:?}")]
    PriceParse {
        raw: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// The configured listing URL is not a valid URL
    #[error("invalid listing URL: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The browser session failed
    #[error("browser session error: {0}")]
    Session(#[from] webdriver::WebDriverError),
}

/// Errors raised by a notification sink.
///
/// Never fatal: the fan-out isolates every sink failure and reports it
/// to the log.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Bot token was not present in the environment
    #[error("bot token is not configured")]
    MissingToken,

    /// No channel given and no default channel configured
    #[error("chat channel is not configured")]
    MissingChannel,

    /// The chat API rejected or failed the delivery
    #[error("delivery failed: {0}")]
    Telegram(#[from] telegram::TelegramError),
}

/// Result type alias for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
