//! The poll loop.
//!
//! One unbounded loop, fully sequential per cycle:
//! extract → fold into the tracker → notify newly confirmed offers →
//! sleep. Termination is an injected [`CancellationToken`] checked at
//! the inter-cycle suspension point. Extraction errors are fatal and
//! propagate out of [`Watcher::run`]; notification errors are isolated
//! inside the fan-out.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::WatcherConfig;
use crate::error::ExtractResult;
use crate::extract::{Extractor, FieldParser, ItemEnumerator};
use crate::notify::Messenger;
use crate::tracker::OfferTracker;

pub struct Watcher<E, P> {
    extractor: Extractor<E, P>,
    tracker: OfferTracker,
    messenger: Messenger,
    poll_interval: Duration,
    shutdown: CancellationToken,
}

impl<E, P> Watcher<E, P>
where
    E: ItemEnumerator,
    P: FieldParser<Item = E::Item>,
{
    pub fn new(
        extractor: Extractor<E, P>,
        messenger: Messenger,
        config: &WatcherConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            extractor,
            tracker: OfferTracker::with_max_missing(config.max_missing),
            messenger,
            poll_interval: config.poll_interval,
            shutdown,
        }
    }

    /// The offers currently tracked.
    pub fn tracker(&self) -> &OfferTracker {
        &self.tracker
    }

    /// Run poll cycles until cancelled or until a cycle fails.
    pub async fn run(mut self) -> ExtractResult<()> {
        info!(interval_secs = self.poll_interval.as_secs(), "watcher started");
        loop {
            self.run_cycle().await?;

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("shutdown requested, stopping watcher");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// One poll cycle. Public so tests can step the loop by hand.
    pub async fn run_cycle(&mut self) -> ExtractResult<()> {
        let offers = self.extractor.extract().await?;
        let delta = self.tracker.update(&offers);

        info!(
            seen = offers.len(),
            added = delta.added.len(),
            removed = delta.removed.len(),
            tracked = self.tracker.len(),
            "poll cycle complete"
        );

        for entry in &delta.added {
            self.messenger.send(&entry.to_markdown(), None).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CannedCard, CannedEnumerator, CannedParser, RecordingSink};

    fn test_config() -> WatcherConfig {
        WatcherConfig::new().with_poll_interval(Duration::from_millis(10))
    }

    fn watcher_with(
        enumerator: CannedEnumerator,
        sink: RecordingSink,
    ) -> Watcher<CannedEnumerator, CannedParser> {
        let config = test_config();
        let extractor = Extractor::new(enumerator, CannedParser, config.whitelist.clone());
        Watcher::new(
            extractor,
            Messenger::new(vec![Box::new(sink)]),
            &config,
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn notifies_only_newly_confirmed_offers() {
        let enumerator = CannedEnumerator::new().with_cards(vec![CannedCard::new(
            "a",
            "RTX 3080",
            699.0,
            59990.0,
        )]);
        let sink = RecordingSink::new();
        let mut watcher = watcher_with(enumerator, sink.clone());

        watcher.run_cycle().await.unwrap();
        watcher.run_cycle().await.unwrap();

        // second sighting of the same offer is not re-announced
        assert_eq!(sink.messages().len(), 1);
        assert!(sink.messages()[0].0.starts_with("[RTX 3080](a)"));
    }

    #[tokio::test]
    async fn cancelled_token_stops_the_loop() {
        let enumerator = CannedEnumerator::new();
        let sink = RecordingSink::new();
        let config = test_config();
        let extractor = Extractor::new(enumerator, CannedParser, config.whitelist.clone());
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let watcher = Watcher::new(
            extractor,
            Messenger::new(vec![Box::new(sink)]),
            &config,
            shutdown,
        );

        // already-cancelled token: the loop runs exactly one cycle
        watcher.run().await.unwrap();
    }
}
