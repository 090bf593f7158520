//! Scripted [`QuoteSource`] for collector tests.
//!
//! Each event gets a fixed reply: quotes, an error, or a delay before
//! replying. Unscripted events return no quotes. The source counts calls and
//! tracks how many fetches ran at once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::collect::QuoteSource;
use crate::domain::{EventId, RawQuote};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Reply {
    Quotes(Vec<RawQuote>),
    Fail(String),
}

#[derive(Debug, Clone)]
struct Script {
    delay: Duration,
    reply: Reply,
}

/// A source with canned replies per event.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    scripts: HashMap<EventId, Script>,
    default_delay: Duration,
    fetch_count: Arc<AtomicU32>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Decrements the in-flight count when a fetch ends or is cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quotes(mut self, event: &str, quotes: Vec<RawQuote>) -> Self {
        self.scripts.insert(
            EventId::from(event),
            Script {
                delay: Duration::ZERO,
                reply: Reply::Quotes(quotes),
            },
        );
        self
    }

    pub fn with_failure(mut self, event: &str, reason: &str) -> Self {
        self.scripts.insert(
            EventId::from(event),
            Script {
                delay: Duration::ZERO,
                reply: Reply::Fail(reason.to_string()),
            },
        );
        self
    }

    /// Delay the reply for an already scripted event.
    pub fn with_delay(mut self, event: &str, delay: Duration) -> Self {
        if let Some(script) = self.scripts.get_mut(&EventId::from(event)) {
            script.delay = delay;
        }
        self
    }

    /// Delay for events without their own delay, unscripted ones included.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Shared counter of `fetch` calls.
    pub fn fetch_count(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.fetch_count)
    }

    /// Most fetches observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn fetch(&self, event: &EventId) -> Result<Vec<RawQuote>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let script = self.scripts.get(event);
        let delay = script
            .map(|s| s.delay)
            .filter(|d| !d.is_zero())
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let Some(script) = script else {
            return Ok(Vec::new());
        };
        match &script.reply {
            Reply::Quotes(quotes) => Ok(quotes.clone()),
            Reply::Fail(reason) => Err(Error::Source(reason.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
