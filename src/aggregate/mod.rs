//! Offer aggregation: folds normalized quotes into one [`OfferSet`] per
//! proposition.
//!
//! Each set keeps at most one quote per side. When several books quote the
//! same side, the better-ranked book in [`BookPriority`] wins and equal ranks
//! keep the first quote seen. The retained quote is what fair probability is
//! computed from, so market identity stays stable across runs; best-price
//! selection is the shopping view's job (see [`crate::shop`]).

mod policy;

use std::collections::BTreeMap;

use crate::domain::{BookPrice, EventId, NormalizedQuote, OfferKey, Side};
use crate::error::QuoteError;

pub use policy::{BookFilter, BookPriority, BooksConfig, LinePolicy, LineRange};

/// What happened to a quote folded into an offer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// First quote for this side.
    Inserted,
    /// Displaced a lower-priority quote.
    Replaced,
    /// An equal or higher-priority quote was already retained.
    Kept,
}

/// The retained quotes for one proposition during one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSet {
    key: OfferKey,
    event_id: Option<EventId>,
    sides: BTreeMap<Side, BookPrice>,
}

impl OfferSet {
    fn new(key: OfferKey, event_id: Option<EventId>) -> Self {
        Self {
            key,
            event_id,
            sides: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn key(&self) -> &OfferKey {
        &self.key
    }

    /// Event of the first quote that carried one.
    #[must_use]
    pub const fn event_id(&self) -> Option<&EventId> {
        self.event_id.as_ref()
    }

    /// Retained price for one side.
    #[must_use]
    pub fn get(&self, side: &Side) -> Option<&BookPrice> {
        self.sides.get(side)
    }

    /// Retained prices in canonical side order.
    pub fn sides(&self) -> impl Iterator<Item = (&Side, &BookPrice)> {
        self.sides.iter()
    }

    /// Number of quoted sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    fn retain(&mut self, quote: NormalizedQuote, priority: &BookPriority) -> Retention {
        if self.event_id.is_none() {
            self.event_id = quote.event_id;
        }
        let incoming = BookPrice::new(quote.book, quote.price);
        match self.sides.get_mut(&quote.side) {
            None => {
                self.sides.insert(quote.side, incoming);
                Retention::Inserted
            }
            Some(current) if priority.prefers(&incoming.book, &current.book) => {
                *current = incoming;
                Retention::Replaced
            }
            Some(_) => Retention::Kept,
        }
    }
}

/// Pass-scoped fold of normalized quotes into offer sets.
#[derive(Debug)]
pub struct OfferAggregator<'a> {
    category: &'a str,
    priority: &'a BookPriority,
    lines: &'a LinePolicy,
    sets: BTreeMap<OfferKey, OfferSet>,
}

impl<'a> OfferAggregator<'a> {
    /// Start an empty pass for one category (league).
    #[must_use]
    pub fn new(category: &'a str, priority: &'a BookPriority, lines: &'a LinePolicy) -> Self {
        Self {
            category,
            priority,
            lines,
            sets: BTreeMap::new(),
        }
    }

    /// Check a quote against the line policy without folding it.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::LineOutOfPolicy`] for implausible lines.
    pub fn admit(&self, quote: &NormalizedQuote) -> Result<(), QuoteError> {
        self.lines.check(self.category, &quote.key)
    }

    /// Fold an admitted quote into its offer set.
    pub fn fold(&mut self, quote: NormalizedQuote) -> Retention {
        let priority = self.priority;
        self.sets
            .entry(quote.key.clone())
            .or_insert_with(|| OfferSet::new(quote.key.clone(), quote.event_id.clone()))
            .retain(quote, priority)
    }

    /// Admit then fold.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::LineOutOfPolicy`]; the quote is not folded.
    pub fn offer(&mut self, quote: NormalizedQuote) -> Result<Retention, QuoteError> {
        self.admit(&quote)?;
        Ok(self.fold(quote))
    }

    /// Number of distinct propositions seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Finish the pass, yielding sets in key order.
    #[must_use]
    pub fn into_offer_sets(self) -> Vec<OfferSet> {
        self.sets.into_values().collect()
    }
}
