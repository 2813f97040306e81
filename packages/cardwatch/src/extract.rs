//! Two-stage extraction strategy.
//!
//! A poll cycle is an [`ItemEnumerator`] (drive the page, collect raw
//! card handles) composed with a [`FieldParser`] (turn one handle into
//! an [`Offer`]). Both are chosen at construction time, so pointing the
//! watcher at a different shop means writing a new enumerator/parser
//! pair and nothing else.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ExtractResult;
use crate::types::Offer;

/// Produces the raw card handles for one poll cycle, including whatever
/// page interaction is needed to make lazy content render.
#[async_trait]
pub trait ItemEnumerator: Send + Sync {
    type Item: Send + Sync;

    /// An empty page yields an empty vec, never an error.
    async fn enumerate(&self) -> ExtractResult<Vec<Self::Item>>;
}

/// Parses one raw card handle into a structured offer.
#[async_trait]
pub trait FieldParser: Send + Sync {
    type Item: Send + Sync;

    async fn parse(&self, item: &Self::Item) -> ExtractResult<Offer>;
}

/// Runs one full poll cycle: enumerate, parse in order, keep relevant
/// offers.
pub struct Extractor<E, P> {
    enumerator: E,
    parser: P,
    whitelist: Vec<String>,
}

impl<E, P> Extractor<E, P>
where
    E: ItemEnumerator,
    P: FieldParser<Item = E::Item>,
{
    pub fn new(enumerator: E, parser: P, whitelist: Vec<String>) -> Self {
        Self {
            enumerator,
            parser,
            whitelist,
        }
    }

    /// Extract all relevant offers, in enumeration order.
    ///
    /// A parser failure on any single card aborts the whole cycle.
    /// Tolerating a malformed card here would let a markup change pass
    /// silently; the hysteresis in the tracker already covers the
    /// benign case of a card briefly absent.
    pub async fn extract(&self) -> ExtractResult<Vec<Offer>> {
        let items = self.enumerator.enumerate().await?;
        debug!(cards = items.len(), "enumerated product cards");

        let mut offers = Vec::new();
        for item in &items {
            let offer = self.parser.parse(item).await?;
            if self.is_relevant(&offer.title) {
                offers.push(offer);
            } else {
                debug!(title = %offer.title, "offer outside watch list");
            }
        }
        Ok(offers)
    }

    fn is_relevant(&self, title: &str) -> bool {
        self.whitelist.iter().any(|term| title.contains(term.as_str()))
    }
}
