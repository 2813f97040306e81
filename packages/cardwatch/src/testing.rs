//! Mock implementations for exercising the pipeline without a browser
//! or a chat API.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{ExtractError, NotifyError};
use crate::extract::{FieldParser, ItemEnumerator};
use crate::notify::Sink;
use crate::types::Offer;

/// A canned product card standing in for a live element handle.
#[derive(Debug, Clone)]
pub struct CannedCard {
    pub url: String,
    pub title: String,
    pub price_eur: f64,
    pub price_rub: f64,
    /// When set, parsing this card fails with a missing-element error.
    pub broken: bool,
}

impl CannedCard {
    pub fn new(url: &str, title: &str, price_eur: f64, price_rub: f64) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            price_eur,
            price_rub,
            broken: false,
        }
    }

    /// A card whose markup is missing a required element.
    pub fn broken(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            price_eur: 0.0,
            price_rub: 0.0,
            broken: true,
        }
    }
}

/// Enumerator returning a configurable list of cards, with call
/// tracking for assertions.
#[derive(Default, Clone)]
pub struct CannedEnumerator {
    cards: Arc<RwLock<Vec<CannedCard>>>,
    calls: Arc<RwLock<usize>>,
}

impl CannedEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(self, cards: Vec<CannedCard>) -> Self {
        *self.cards.write().unwrap() = cards;
        self
    }

    /// Replace the cards returned by subsequent polls.
    pub fn set_cards(&self, cards: Vec<CannedCard>) {
        *self.cards.write().unwrap() = cards;
    }

    pub fn call_count(&self) -> usize {
        *self.calls.read().unwrap()
    }
}

#[async_trait]
impl ItemEnumerator for CannedEnumerator {
    type Item = CannedCard;

    async fn enumerate(&self) -> Result<Vec<CannedCard>, ExtractError> {
        *self.calls.write().unwrap() += 1;
        Ok(self.cards.read().unwrap().clone())
    }
}

/// Parser reading fields straight off a [`CannedCard`].
pub struct CannedParser;

#[async_trait]
impl FieldParser for CannedParser {
    type Item = CannedCard;

    async fn parse(&self, item: &CannedCard) -> Result<Offer, ExtractError> {
        if item.broken {
            return Err(ExtractError::MissingElement {
                selector: "a[class='c-productItem__head__name']".to_string(),
            });
        }
        Ok(Offer {
            url: item.url.clone(),
            title: item.title.clone(),
            price_eur: item.price_eur,
            price_rub: item.price_rub,
        })
    }
}

/// Sink recording every delivered message.
#[derive(Default, Clone)]
pub struct RecordingSink {
    messages: Arc<RwLock<Vec<(String, Option<String>)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, as `(text, channel)` pairs.
    pub fn messages(&self) -> Vec<(String, Option<String>)> {
        self.messages.read().unwrap().clone()
    }
}

#[async_trait]
impl Sink for RecordingSink {
    async fn send(&self, message: &str, channel: Option<&str>) -> Result<(), NotifyError> {
        self.messages
            .write()
            .unwrap()
            .push((message.to_string(), channel.map(str::to_string)));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Sink that always fails, for exercising failure isolation.
pub struct FailingSink;

#[async_trait]
impl Sink for FailingSink {
    async fn send(&self, _message: &str, _channel: Option<&str>) -> Result<(), NotifyError> {
        Err(NotifyError::MissingToken)
    }

    fn name(&self) -> &str {
        "failing"
    }
}
