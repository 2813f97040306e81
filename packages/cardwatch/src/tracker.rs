//! Change tracking across poll cycles.
//!
//! The tracker owns the set of known offers and turns each poll's parse
//! results into the delta that drives notifications. An offer missing
//! from a handful of consecutive polls is not treated as gone — page
//! load timing regularly drops a card from a single scrape — so
//! eviction only happens once the absence counter exceeds
//! [`WatcherConfig::max_missing`](crate::config::WatcherConfig).
//!
//! State machine per tracked offer:
//!
//! ```text
//! (new url) ──► ACTIVE(missing=0)
//!     seen      ──► missing = 0
//!     not seen  ──► missing += 1
//!     missing > max ──► evicted (terminal; a later reappearance
//!                       creates a brand-new entry)
//! ```

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::types::{Offer, TrackedOffer};

const DEFAULT_MAX_MISSING: u32 = 3;

/// Offers added and evicted by one `update` call.
#[derive(Debug, Default, Clone)]
pub struct TrackerDelta {
    /// Newly confirmed offers, in poll order.
    pub added: Vec<TrackedOffer>,
    /// Offers whose absence counter crossed the threshold this cycle.
    pub removed: Vec<TrackedOffer>,
}

/// In-memory store of offers seen across polls.
///
/// Owned exclusively by the poll loop, so mutation is plain `&mut self`
/// with no lock.
#[derive(Debug)]
pub struct OfferTracker {
    entries: HashMap<String, TrackedOffer>,
    max_missing: u32,
}

impl Default for OfferTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl OfferTracker {
    pub fn new() -> Self {
        Self::with_max_missing(DEFAULT_MAX_MISSING)
    }

    pub fn with_max_missing(max_missing: u32) -> Self {
        Self {
            entries: HashMap::new(),
            max_missing,
        }
    }

    /// Number of offers currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&TrackedOffer> {
        self.entries.get(url)
    }

    /// Fold one poll's offers into the store.
    ///
    /// Order of operations: absence counters are bumped first for every
    /// entry not present in this poll, then present offers are inserted
    /// or re-confirmed in poll order, then entries past the threshold
    /// are evicted. Re-confirmation resets the absence counter but does
    /// NOT refresh the stored fields.
    pub fn update(&mut self, offers: &[Offer]) -> TrackerDelta {
        let seen: HashSet<&str> = offers.iter().map(|offer| offer.url.as_str()).collect();

        for (url, entry) in self.entries.iter_mut() {
            if !seen.contains(url.as_str()) {
                entry.missing += 1;
            }
        }

        let mut added = Vec::new();
        for offer in offers {
            match self.entries.get_mut(&offer.url) {
                Some(entry) => entry.missing = 0,
                None => {
                    let entry = TrackedOffer::from_offer(offer.clone());
                    info!(url = %entry.url, title = %entry.title, price_eur = entry.price_eur, "offer added");
                    self.entries.insert(entry.url.clone(), entry.clone());
                    added.push(entry);
                }
            }
        }

        let max_missing = self.max_missing;
        let mut removed = Vec::new();
        self.entries.retain(|_, entry| {
            if entry.missing > max_missing {
                info!(url = %entry.url, title = %entry.title, missing = entry.missing, "offer evicted");
                removed.push(entry.clone());
                false
            } else {
                true
            }
        });

        TrackerDelta { added, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(url: &str, title: &str) -> Offer {
        Offer {
            url: url.to_string(),
            title: title.to_string(),
            price_eur: 699.0,
            price_rub: 59990.0,
        }
    }

    #[test]
    fn first_sighting_is_added() {
        let mut tracker = OfferTracker::new();
        let delta = tracker.update(&[offer("a", "RTX 3080")]);

        assert_eq!(delta.added.len(), 1);
        assert_eq!(delta.added[0].url, "a");
        assert_eq!(delta.added[0].missing, 0);
        assert!(delta.removed.is_empty());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn repeated_identical_poll_is_a_no_op() {
        let mut tracker = OfferTracker::new();
        let offers = [offer("a", "RTX 3080"), offer("b", "RTX 3090")];
        tracker.update(&offers);

        let delta = tracker.update(&offers);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
        assert_eq!(tracker.get("a").unwrap().missing, 0);
        assert_eq!(tracker.get("b").unwrap().missing, 0);
    }

    #[test]
    fn absence_survives_threshold_then_evicts() {
        let mut tracker = OfferTracker::new();
        tracker.update(&[offer("a", "RTX 3080")]);

        for expected_missing in 1..=3 {
            let delta = tracker.update(&[]);
            assert!(delta.removed.is_empty());
            assert_eq!(tracker.get("a").unwrap().missing, expected_missing);
        }

        let delta = tracker.update(&[]);
        assert_eq!(delta.removed.len(), 1);
        assert_eq!(delta.removed[0].url, "a");
        assert!(tracker.is_empty());
    }

    #[test]
    fn missing_counter_stays_within_bounds_while_tracked() {
        let mut tracker = OfferTracker::new();
        tracker.update(&[offer("a", "RTX 3080")]);

        for _ in 0..10 {
            tracker.update(&[]);
            if let Some(entry) = tracker.get("a") {
                assert!(entry.missing <= 3, "tracked entry exceeded hysteresis window");
            }
            tracker.update(&[offer("a", "RTX 3080")]);
            assert_eq!(tracker.get("a").unwrap().missing, 0);
        }
    }

    #[test]
    fn reappearance_resets_the_absence_counter() {
        let mut tracker = OfferTracker::new();
        tracker.update(&[offer("a", "RTX 3080")]);
        tracker.update(&[]);
        tracker.update(&[]);
        assert_eq!(tracker.get("a").unwrap().missing, 2);

        let delta = tracker.update(&[offer("a", "RTX 3080")]);
        assert!(delta.added.is_empty());
        assert_eq!(tracker.get("a").unwrap().missing, 0);
    }

    // Frozen-field behavior is deliberate: the first sighting wins and
    // later price/title drift on the same URL stays invisible.
    #[test]
    fn stored_fields_are_frozen_after_creation() {
        let mut tracker = OfferTracker::new();
        tracker.update(&[offer("x", "RTX 3080 Gaming OC")]);

        let mut changed = offer("x", "RTX 3080 Eagle");
        changed.price_eur = 999.0;
        let delta = tracker.update(&[changed]);

        assert!(delta.added.is_empty());
        let entry = tracker.get("x").unwrap();
        assert_eq!(entry.title, "RTX 3080 Gaming OC");
        assert_eq!(entry.price_eur, 699.0);
    }

    #[test]
    fn evicted_url_is_immediately_recreatable() {
        let mut tracker = OfferTracker::new();
        tracker.update(&[offer("a", "RTX 3080")]);
        for _ in 0..4 {
            tracker.update(&[]);
        }
        assert!(tracker.is_empty());

        let delta = tracker.update(&[offer("a", "RTX 3080")]);
        assert_eq!(delta.added.len(), 1);
        assert_eq!(tracker.get("a").unwrap().missing, 0);
    }

    #[test]
    fn eviction_happens_exactly_once() {
        let mut tracker = OfferTracker::new();
        tracker.update(&[offer("a", "RTX 3080")]);

        let mut total_removed = 0;
        for _ in 0..8 {
            total_removed += tracker.update(&[]).removed.len();
        }
        assert_eq!(total_removed, 1);
    }

    #[test]
    fn mixed_poll_updates_each_entry_independently() {
        let mut tracker = OfferTracker::new();
        tracker.update(&[offer("a", "RTX 3080"), offer("b", "RX 6800 XT")]);

        let delta = tracker.update(&[offer("a", "RTX 3080"), offer("c", "RTX 3070")]);
        assert_eq!(delta.added.len(), 1);
        assert_eq!(delta.added[0].url, "c");
        assert_eq!(tracker.get("a").unwrap().missing, 0);
        assert_eq!(tracker.get("b").unwrap().missing, 1);
        assert_eq!(tracker.get("c").unwrap().missing, 0);
    }

    #[test]
    fn added_preserves_poll_order() {
        let mut tracker = OfferTracker::new();
        let delta = tracker.update(&[
            offer("c", "RTX 3070"),
            offer("a", "RTX 3080"),
            offer("b", "RTX 3090"),
        ]);
        let urls: Vec<&str> = delta.added.iter().map(|entry| entry.url.as_str()).collect();
        assert_eq!(urls, vec!["c", "a", "b"]);
    }
}
