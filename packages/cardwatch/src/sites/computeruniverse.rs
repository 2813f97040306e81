//! Enumerator and parser for the computeruniverse.net listing.
//!
//! Everything in this file is coupled to the shop's exact markup: the
//! card selector, the name link, the two price cells and the string
//! cleaning their innerHTML needs. When the markup changes, this file
//! changes; nothing outside it should have to.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;
use webdriver::{Element, WebDriverSession};

use crate::config::WatcherConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::extract::{FieldParser, ItemEnumerator};
use crate::types::Offer;

const PRODUCT_CARD: &str = "div[class='c-productItem']";
const NAME_LINK: &str = "a[class='c-productItem__head__name']";
const PRICE_EUR: &str = "div[class='price price--blue-4xl flex']";
const PRICE_RUB: &str = "div[class='price price--grey-alt flex']";

/// Walks the listing page and collects product card elements.
///
/// Products below the fold only materialize once the viewport reaches
/// them, so the page is scrolled down one viewport-height at a time
/// with a settle delay before each step.
pub struct CuEnumerator {
    session: WebDriverSession,
    listing: Url,
    scroll_steps: u32,
    scroll_delay: Duration,
}

impl CuEnumerator {
    pub fn new(session: WebDriverSession, config: &WatcherConfig) -> ExtractResult<Self> {
        let mut listing = Url::parse(&config.listing_url).map_err(|source| {
            ExtractError::InvalidUrl {
                url: config.listing_url.clone(),
                source,
            }
        })?;
        listing.set_query(Some(&config.listing_query));

        Ok(Self {
            session,
            listing,
            scroll_steps: config.scroll_steps,
            scroll_delay: config.scroll_delay,
        })
    }
}

#[async_trait]
impl ItemEnumerator for CuEnumerator {
    type Item = Element;

    async fn enumerate(&self) -> ExtractResult<Vec<Element>> {
        self.session.goto(self.listing.as_str()).await?;

        let viewport = self.session.window_rect().await?;
        let mut y = 0.0;
        for _ in 0..self.scroll_steps {
            tokio::time::sleep(self.scroll_delay).await;
            y += viewport.height;
            self.session
                .execute(&format!("window.scrollTo(0, {y})"))
                .await?;
        }

        Ok(self.session.find_all(PRODUCT_CARD).await?)
    }
}

/// Reads the name link and both price cells of one product card.
pub struct CuParser;

#[async_trait]
impl FieldParser for CuParser {
    type Item = Element;

    async fn parse(&self, item: &Element) -> ExtractResult<Offer> {
        let name = find_required(item, NAME_LINK).await?;
        let url = name
            .attribute("href")
            .await?
            .ok_or_else(|| ExtractError::MissingElement {
                selector: NAME_LINK.to_string(),
            })?;
        let title = name.text().await?.trim().to_string();

        Ok(Offer {
            url,
            title,
            price_eur: price_from(item, PRICE_EUR).await?,
            price_rub: price_from(item, PRICE_RUB).await?,
        })
    }
}

async fn find_required(item: &Element, selector: &str) -> ExtractResult<Element> {
    item.find(selector).await.map_err(|error| {
        if error.is_no_such_element() {
            ExtractError::MissingElement {
                selector: selector.to_string(),
            }
        } else {
            ExtractError::Session(error)
        }
    })
}

async fn price_from(item: &Element, selector: &str) -> ExtractResult<f64> {
    let cell = find_required(item, selector).await?;
    let markup = cell
        .attribute("innerHTML")
        .await?
        .ok_or_else(|| ExtractError::MissingElement {
            selector: selector.to_string(),
        })?;
    clean_price(&markup)
}

/// Reduce a price cell's raw markup to a number.
///
/// The cell renders e.g. `<span>1</span>.299,<sup>00</sup>&nbsp;€`:
/// inline tags and the non-breaking space are stripped, `.` thousands
/// separators removed, the decimal comma turned into a point, and the
/// single trailing currency symbol cut before parsing.
fn clean_price(markup: &str) -> ExtractResult<f64> {
    let cleaned = markup
        .replace("<span>", "")
        .replace("</span>", "")
        .replace("<sup>", "")
        .replace("</sup>", "")
        .replace("&nbsp;", "")
        .replace('.', "")
        .replace(',', ".");

    let mut chars = cleaned.chars();
    chars.next_back();
    let numeric = chars.as_str();

    numeric
        .parse::<f64>()
        .map_err(|source| ExtractError::PriceParse {
            raw: markup.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_eur_price_markup() {
        let price = clean_price("<span>1</span>.299,<sup>00</sup>&nbsp;€").unwrap();
        assert_eq!(price, 1299.0);
    }

    #[test]
    fn cleans_plain_price_markup() {
        assert_eq!(clean_price("699,00&nbsp;€").unwrap(), 699.0);
        assert_eq!(clean_price("59.990,00&nbsp;₽").unwrap(), 59990.0);
    }

    #[test]
    fn keeps_fractional_part() {
        assert_eq!(clean_price("149,95&nbsp;€").unwrap(), 149.95);
    }

    #[test]
    fn rejects_markup_without_a_number() {
        let error = clean_price("&nbsp;—").unwrap_err();
        assert!(matches!(error, ExtractError::PriceParse { .. }));
    }

    #[test]
    fn rejects_empty_markup() {
        assert!(matches!(
            clean_price(""),
            Err(ExtractError::PriceParse { .. })
        ));
    }
}
