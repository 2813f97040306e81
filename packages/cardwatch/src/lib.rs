//! GPU offer watcher for computeruniverse.net.
//!
//! Polls the graphics-card listing on a fixed interval, extracts offer
//! records through a pluggable enumerate-then-parse strategy, tracks
//! which offers are new / known / gone with absence hysteresis, and
//! fans notifications for newly confirmed offers out to every
//! registered sink.
//!
//! # Modules
//!
//! - [`tracker`] - change tracking with missing-count hysteresis
//! - [`extract`] - two-stage extraction strategy and composition
//! - [`sites`] - per-shop enumerator/parser implementations
//! - [`notify`] - notification fan-out with uniform failure isolation
//! - [`watcher`] - the poll loop
//! - [`testing`] - mocks for running the pipeline without a browser

pub mod config;
pub mod error;
pub mod extract;
pub mod notify;
pub mod sites;
pub mod testing;
pub mod tracker;
pub mod types;
pub mod watcher;

pub use config::{EnvConfig, WatcherConfig};
pub use error::{ExtractError, ExtractResult, NotifyError};
pub use extract::{Extractor, FieldParser, ItemEnumerator};
pub use notify::{Messenger, Sink, TelegramSink, TracingSink};
pub use sites::{CuEnumerator, CuParser};
pub use tracker::{OfferTracker, TrackerDelta};
pub use types::{Offer, TrackedOffer};
pub use watcher::Watcher;
