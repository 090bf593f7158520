//! One pricing pass end to end.
//!
//! ```text
//! RawQuote -> QuoteNormalizer -> BookFilter -> LinePolicy
//!          -> OfferAggregator (fair basis) + LineShopper (best price)
//!          -> price_offer_set -> assemble_market -> FairMarket
//! ```
//!
//! All pass state is local to [`PricingEngine::run`]; an engine can be shared
//! across threads and run concurrently for different batches.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{BookFilter, BookPriority, LinePolicy, OfferAggregator};
use crate::assemble::assemble_market;
use crate::config::Config;
use crate::devig::price_offer_set;
use crate::domain::{FairMarket, RawQuote};
use crate::error::QuoteError;
use crate::normalize::{QuoteNormalizer, SideVocabulary};
use crate::shop::LineShopper;

/// Counts describing what a pass did with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Records received, including malformed ones.
    pub received: usize,
    /// Records that could not be read as a quote at all.
    pub malformed: usize,
    /// Quotes folded into offer sets.
    pub accepted: usize,
    /// Dropped quotes by reason.
    pub dropped_quotes: BTreeMap<&'static str, usize>,
    /// Omitted markets by reason.
    pub dropped_markets: BTreeMap<&'static str, usize>,
    /// Markets emitted.
    pub markets: usize,
}

impl PassReport {
    fn drop_quote(&mut self, err: &QuoteError) {
        *self.dropped_quotes.entry(err.kind()).or_default() += 1;
    }

    /// Total quotes dropped for any reason.
    #[must_use]
    pub fn quotes_dropped(&self) -> usize {
        self.dropped_quotes.values().sum()
    }

    /// Total markets omitted for any reason.
    #[must_use]
    pub fn markets_dropped(&self) -> usize {
        self.dropped_markets.values().sum()
    }
}

/// Result of one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassOutcome {
    /// Priced markets in key order.
    pub markets: Vec<FairMarket>,
    pub report: PassReport,
}

/// Stateless pricing pipeline.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    normalizer: QuoteNormalizer,
    priority: BookPriority,
    filter: BookFilter,
    lines: LinePolicy,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PricingEngine {
    /// Build an engine from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            normalizer: QuoteNormalizer::new(SideVocabulary::new(&config.sides)),
            priority: BookPriority::from_config(&config.books),
            filter: BookFilter::from_config(&config.books),
            lines: config.lines.clone(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: BookPriority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_book_filter(mut self, filter: BookFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_line_policy(mut self, lines: LinePolicy) -> Self {
        self.lines = lines;
        self
    }

    #[must_use]
    pub fn with_sides(mut self, sides: SideVocabulary) -> Self {
        self.normalizer = QuoteNormalizer::new(sides);
        self
    }

    #[must_use]
    pub fn priority(&self) -> &BookPriority {
        &self.priority
    }

    #[must_use]
    pub fn line_policy(&self) -> &LinePolicy {
        &self.lines
    }

    /// Price one batch of quotes for a category (league).
    ///
    /// Never fails: bad quotes and unpriceable markets are dropped and
    /// counted in the report.
    pub fn run<'q, I>(&self, category: &str, quotes: I) -> PassOutcome
    where
        I: IntoIterator<Item = &'q RawQuote>,
    {
        self.run_counted(category, quotes, PassReport::default())
    }

    /// Price a JSON array of quote records.
    ///
    /// A document that is not a JSON array yields an empty outcome; elements
    /// that are not quote records are counted as malformed and skipped.
    pub fn run_json(&self, category: &str, json: &str) -> PassOutcome {
        let records = match serde_json::from_str::<Vec<serde_json::Value>>(json) {
            Ok(records) => records,
            Err(err) => {
                warn!(category, error = %err, "quote batch is not a JSON array");
                return PassOutcome {
                    markets: Vec::new(),
                    report: PassReport {
                        malformed: 1,
                        ..PassReport::default()
                    },
                };
            }
        };

        let mut report = PassReport::default();
        let mut quotes = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_value::<RawQuote>(record) {
                Ok(quote) => quotes.push(quote),
                Err(err) => {
                    debug!(category, error = %err, "skipping malformed quote record");
                    report.received += 1;
                    report.malformed += 1;
                }
            }
        }
        self.run_counted(category, &quotes, report)
    }

    fn run_counted<'q, I>(&self, category: &str, quotes: I, mut report: PassReport) -> PassOutcome
    where
        I: IntoIterator<Item = &'q RawQuote>,
    {
        let category = category.trim().to_lowercase();
        let mut aggregator = OfferAggregator::new(&category, &self.priority, &self.lines);
        let mut shopper = LineShopper::new(&self.priority);

        for raw in quotes {
            report.received += 1;
            let admitted = self.normalizer.normalize(raw).and_then(|quote| {
                self.filter.check(&quote.book)?;
                aggregator.admit(&quote)?;
                Ok(quote)
            });
            match admitted {
                Ok(quote) => {
                    shopper.record(&quote);
                    aggregator.fold(quote);
                    report.accepted += 1;
                }
                Err(err) => {
                    debug!(
                        category = %category,
                        subject = %raw.subject,
                        market = %raw.market_key,
                        book = %raw.source_book,
                        reason = err.kind(),
                        error = %err,
                        "quote dropped"
                    );
                    report.drop_quote(&err);
                }
            }
        }

        let mut markets = Vec::with_capacity(aggregator.len());
        for set in aggregator.into_offer_sets() {
            match price_offer_set(&set) {
                Ok(distribution) => markets.push(assemble_market(&set, distribution, &shopper)),
                Err(err) => {
                    debug!(
                        category = %category,
                        key = %set.key(),
                        reason = err.kind(),
                        error = %err,
                        "market omitted"
                    );
                    *report.dropped_markets.entry(err.kind()).or_default() += 1;
                }
            }
        }
        report.markets = markets.len();

        info!(
            category = %category,
            received = report.received,
            accepted = report.accepted,
            quotes_dropped = report.quotes_dropped(),
            markets = report.markets,
            markets_dropped = report.markets_dropped(),
            "pricing pass complete"
        );

        PassOutcome { markets, report }
    }
}
