//! Line shopping: best available price per side across every book.
//!
//! This view is built from the same admitted quotes as the offer sets but is
//! independent of which book's price fed the fair probability. Ties on the
//! best payout resolve by [`BookPriority`] and then by book id, never by
//! arrival order, so identical input always selects the same book.
//!
//! Keys are compared exactly; near-duplicate keys from upstream formatting
//! drift stay separate.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::aggregate::BookPriority;
use crate::domain::{BookPrice, NormalizedQuote, OfferKey, Side};

/// Every book's price for one side, held in book-priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideOffers {
    offers: Vec<BookPrice>,
}

impl SideOffers {
    /// Offers in book-priority order, one per book.
    #[must_use]
    pub fn offers(&self) -> &[BookPrice] {
        &self.offers
    }

    /// Highest payout; the earliest book in priority order wins ties.
    #[must_use]
    pub fn best(&self) -> Option<&BookPrice> {
        self.offers.iter().fold(None, |best: Option<&BookPrice>, offer| match best {
            Some(b) if b.american.payout_cmp(offer.american) != Ordering::Less => Some(b),
            _ => Some(offer),
        })
    }

    fn record(&mut self, offer: BookPrice, priority: &BookPriority) {
        match self.offers.iter_mut().find(|o| o.book == offer.book) {
            Some(existing) => {
                if offer.american.payout_cmp(existing.american) == Ordering::Greater {
                    existing.american = offer.american;
                }
            }
            None => {
                let at = self.offers.partition_point(|o| {
                    priority.cmp_books(&o.book, &offer.book) == Ordering::Less
                });
                self.offers.insert(at, offer);
            }
        }
    }
}

/// Pass-scoped best-price view over all admitted quotes.
#[derive(Debug)]
pub struct LineShopper<'a> {
    priority: &'a BookPriority,
    view: BTreeMap<OfferKey, BTreeMap<Side, SideOffers>>,
}

impl<'a> LineShopper<'a> {
    #[must_use]
    pub fn new(priority: &'a BookPriority) -> Self {
        Self {
            priority,
            view: BTreeMap::new(),
        }
    }

    /// Record a quote. A book quoting the same side twice keeps its better price.
    pub fn record(&mut self, quote: &NormalizedQuote) {
        self.view
            .entry(quote.key.clone())
            .or_default()
            .entry(quote.side.clone())
            .or_default()
            .record(BookPrice::new(quote.book.clone(), quote.price), self.priority);
    }

    /// All offers for one side of one key.
    #[must_use]
    pub fn side(&self, key: &OfferKey, side: &Side) -> Option<&SideOffers> {
        self.view.get(key).and_then(|sides| sides.get(side))
    }

    /// Best price for one side of one key.
    #[must_use]
    pub fn best(&self, key: &OfferKey, side: &Side) -> Option<&BookPrice> {
        self.side(key, side).and_then(SideOffers::best)
    }

    /// Number of keys in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }
}
