//! Bounded, time-boxed quote collection across events.
//!
//! A [`QuoteSource`] is fetched once per event with at most
//! [`CollectConfig::workers`] fetches in flight. Each fetch is cut off after
//! [`CollectConfig::fetch_timeout`]. A failed or timed-out event contributes
//! no quotes and does not affect the others. Results keep the input event
//! order, so first-seen ordering downstream does not depend on which fetch
//! finished first.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{EventId, RawQuote};
use crate::error::{ConfigError, Error, Result};

/// A feed of raw quotes keyed by event.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch every quote the source holds for one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream fetch fails.
    async fn fetch(&self, event: &EventId) -> Result<Vec<RawQuote>>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Collection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectConfig {
    /// Maximum concurrent fetches.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Per-event fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn default_workers() -> usize {
    4
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

impl CollectConfig {
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "collection.workers",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "collection.fetch_timeout_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Quotes gathered from one collection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// Quotes in event order, then source order within an event.
    pub quotes: Vec<RawQuote>,
    /// Events whose fetch failed or timed out.
    pub failed: Vec<EventId>,
}

/// Fetch quotes for every event.
///
/// Quotes without an event id are stamped with the event they were fetched
/// for.
pub async fn collect_quotes<S>(source: &S, events: &[EventId], config: &CollectConfig) -> Collection
where
    S: QuoteSource + ?Sized,
{
    let timeout = config.fetch_timeout();
    let results: Vec<(EventId, Result<Vec<RawQuote>>)> = stream::iter(events.iter().cloned())
        .map(|event| async move {
            let fetched = match tokio::time::timeout(timeout, source.fetch(&event)).await {
                Ok(fetched) => fetched,
                Err(_) => Err(Error::Source(format!(
                    "fetch timed out after {}ms",
                    timeout.as_millis()
                ))),
            };
            (event, fetched)
        })
        .buffered(config.workers.max(1))
        .collect()
        .await;

    let mut collection = Collection::default();
    for (event, fetched) in results {
        match fetched {
            Ok(quotes) => {
                debug!(
                    source = source.name(),
                    event = %event,
                    quotes = quotes.len(),
                    "event fetched"
                );
                collection
                    .quotes
                    .extend(quotes.into_iter().map(|quote| stamp_event(quote, &event)));
            }
            Err(err) => {
                warn!(source = source.name(), event = %event, error = %err, "event fetch failed");
                collection.failed.push(event);
            }
        }
    }
    collection
}

fn stamp_event(mut quote: RawQuote, event: &EventId) -> RawQuote {
    let missing = quote
        .event_id
        .as_deref()
        .map_or(true, |id| id.trim().is_empty());
    if missing {
        quote.event_id = Some(event.to_string());
    }
    quote
}
