//! Watcher configuration.
//!
//! Poll cadence, scroll behavior, eviction hysteresis and the relevance
//! whitelist are fixed constants with builder-style overrides. Secrets
//! come from the environment; a missing secret surfaces on the first
//! delivery attempt, not at startup.

use std::time::Duration;

/// Product listing for PCIe graphics cards.
pub const DEFAULT_LISTING_URL: &str =
    "https://www.computeruniverse.net/en/c/hardware-components/pci-express-graphics-cards";

/// Query toggle restricting the listing to items available now.
pub const DEFAULT_LISTING_QUERY: &str = "toggle[deliverydatenow]=true";

/// Product families worth notifying about.
const DEFAULT_WHITELIST: [&str; 6] = ["3070", "3080", "3090", "6700", "6800", "6900"];

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Delay between poll cycles.
    pub poll_interval: Duration,
    /// Viewport-height scroll steps forcing lazy content to render.
    pub scroll_steps: u32,
    /// Settle delay before each scroll step.
    pub scroll_delay: Duration,
    /// Consecutive absent polls tolerated before an offer is evicted.
    pub max_missing: u32,
    /// Title substrings that make an offer relevant.
    pub whitelist: Vec<String>,
    pub listing_url: String,
    pub listing_query: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            scroll_steps: 5,
            scroll_delay: Duration::from_millis(500),
            max_missing: 3,
            whitelist: DEFAULT_WHITELIST.iter().map(|s| s.to_string()).collect(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            listing_query: DEFAULT_LISTING_QUERY.to_string(),
        }
    }
}

impl WatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_scroll(mut self, steps: u32, delay: Duration) -> Self {
        self.scroll_steps = steps;
        self.scroll_delay = delay;
        self
    }

    pub fn with_max_missing(mut self, max_missing: u32) -> Self {
        self.max_missing = max_missing;
        self
    }

    pub fn with_whitelist<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = terms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_listing(mut self, url: impl Into<String>, query: impl Into<String>) -> Self {
        self.listing_url = url.into();
        self.listing_query = query.into();
        self
    }
}

/// Process environment: WebDriver endpoint and chat credentials.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub webdriver_url: String,
    pub telegram_token: Option<String>,
    pub telegram_channel: Option<String>,
}

impl EnvConfig {
    /// Read from the process environment. Absent chat credentials are
    /// carried as `None` and fail the chat sink lazily.
    pub fn from_env() -> Self {
        Self {
            webdriver_url: std::env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| "http://localhost:9515".to_string()),
            telegram_token: std::env::var("TG_TOKEN").ok(),
            telegram_channel: std::env::var("TG_CHANNEL").ok(),
        }
    }
}
