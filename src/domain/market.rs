//! Priced market records handed to downstream consumers.
//!
//! - [`FairMarket`] - One proposition with fair probabilities per side
//! - [`FairSide`] - Fair value, basis price, best shop price and raw offers
//! - [`Derivation`] - How the fair distribution was derived

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{BookId, EventId};
use super::odds::{clamp_probability, AmericanOdds};
use super::quote::OfferKey;
use super::side::Side;

/// Method used to produce a market's fair distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    /// Over and under (or two named outcomes) quoted, proportionally normalized.
    TwoWay,
    /// Two or more buckets (or three or more named outcomes), proportionally normalized.
    NWay,
    /// One binary side quoted; complement is `1 - implied`.
    SingleSided,
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TwoWay => "two_way",
            Self::NWay => "n_way",
            Self::SingleSided => "single_sided",
        };
        f.write_str(label)
    }
}

/// A book and the American price it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPrice {
    pub book: BookId,
    pub american: AmericanOdds,
}

impl BookPrice {
    pub fn new(book: BookId, american: AmericanOdds) -> Self {
        Self { book, american }
    }
}

/// Value of the shop price measured against the fair probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShopMetrics {
    /// Decimal odds of the shop price.
    pub decimal: f64,
    /// Expected value per unit stake: `q * decimal - 1`.
    pub ev: f64,
    /// Shop decimal odds over fair decimal odds, minus one.
    pub edge_vs_fair: f64,
}

impl ShopMetrics {
    /// Measure `price` against fair probability `q`.
    #[must_use]
    pub fn measure(q: f64, price: AmericanOdds) -> Self {
        let decimal = price.decimal_odds();
        let fair_decimal = 1.0 / clamp_probability(q);
        Self {
            decimal,
            ev: q * decimal - 1.0,
            edge_vs_fair: decimal / fair_decimal - 1.0,
        }
    }
}

/// One side of a priced market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairSide {
    pub side: Side,
    pub fair_probability: f64,
    pub fair_american: i32,
    /// Price the fair probability was computed from.
    pub basis: Option<BookPrice>,
    /// Best available price across all books.
    pub shop: Option<BookPrice>,
    pub metrics: Option<ShopMetrics>,
    /// Every book's price for this side, in book-priority order.
    pub offers: Vec<BookPrice>,
}

/// A proposition with a margin-free probability for every side.
///
/// Invariant: `fair_probability` across `sides` sums to 1.0 within 1e-6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairMarket {
    pub event_id: Option<EventId>,
    pub subject: String,
    pub market_key: String,
    pub line: Option<Decimal>,
    pub derivation: Derivation,
    pub sides: Vec<FairSide>,
}

impl FairMarket {
    /// Key identifying the proposition this market prices.
    #[must_use]
    pub fn key(&self) -> OfferKey {
        OfferKey::new(self.subject.clone(), self.market_key.clone(), self.line)
    }

    /// Look up one side.
    #[must_use]
    pub fn side(&self, side: &Side) -> Option<&FairSide> {
        self.sides.iter().find(|s| &s.side == side)
    }

    /// Fair probability of one side, if present.
    #[must_use]
    pub fn probability(&self, side: &Side) -> Option<f64> {
        self.side(side).map(|s| s.fair_probability)
    }

    /// Sum of fair probabilities across all sides.
    #[must_use]
    pub fn total_probability(&self) -> f64 {
        self.sides.iter().map(|s| s.fair_probability).sum()
    }

    /// The side with the highest fair probability (first on ties).
    #[must_use]
    pub fn favorite(&self) -> Option<&FairSide> {
        self.sides.iter().fold(None, |best: Option<&FairSide>, s| match best {
            Some(b) if b.fair_probability >= s.fair_probability => Some(b),
            _ => Some(s),
        })
    }
}
