//! American odds and probability conversions.
//!
//! - [`AmericanOdds`] - A validated, nonzero American price
//! - [`probability_to_american`] - Fair probability back to an American price
//! - [`clamp_probability`] - Keeps probabilities away from 0 and 1 before division

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// Lower bound applied to probabilities before converting to prices.
pub const PROBABILITY_FLOOR: f64 = 1e-6;

/// A nonzero American-odds price.
///
/// Positive values are the profit on a 100 stake (underdog), negative values
/// the stake needed to win 100 (favorite).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    /// Create a price with validation.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::InvalidPrice`] for zero.
    pub fn try_new(value: i32) -> Result<Self, QuoteError> {
        if value == 0 {
            return Err(QuoteError::InvalidPrice {
                reason: "American odds cannot be zero".into(),
            });
        }
        Ok(Self(value))
    }

    /// Raw signed value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Implied probability including the bookmaker margin.
    ///
    /// `100 / (p + 100)` for positive prices, `|p| / (|p| + 100)` for negative.
    #[must_use]
    pub fn implied_probability(self) -> f64 {
        let p = f64::from(self.0);
        if p > 0.0 {
            100.0 / (p + 100.0)
        } else {
            p.abs() / (p.abs() + 100.0)
        }
    }

    /// Decimal (European) odds: total return per unit stake.
    #[must_use]
    pub fn decimal_odds(self) -> f64 {
        let p = f64::from(self.0);
        if p > 0.0 {
            1.0 + p / 100.0
        } else {
            1.0 + 100.0 / p.abs()
        }
    }

    /// Profit per unit stake as an exact fraction `(numerator, denominator)`.
    fn profit_ratio(self) -> (i64, i64) {
        let p = i64::from(self.0);
        if p > 0 {
            (p, 100)
        } else {
            (100, p.abs())
        }
    }

    /// Compare payouts exactly. `Greater` means `self` pays more than `other`.
    #[must_use]
    pub fn payout_cmp(self, other: Self) -> Ordering {
        let (an, ad) = self.profit_ratio();
        let (bn, bd) = other.profit_ratio();
        (an * bd).cmp(&(bn * ad))
    }
}

impl TryFrom<i32> for AmericanOdds {
    type Error = QuoteError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<AmericanOdds> for i32 {
    fn from(odds: AmericanOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Clamp a probability into `[PROBABILITY_FLOOR, 1 - PROBABILITY_FLOOR]`.
#[must_use]
pub fn clamp_probability(q: f64) -> f64 {
    q.clamp(PROBABILITY_FLOOR, 1.0 - PROBABILITY_FLOOR)
}

/// Convert a probability to its margin-free American price.
///
/// Favorites (q >= 0.5) map to `round(-100q / (1 - q))`, underdogs to
/// `round(100(1 - q) / q)`. NaN is treated as an even chance.
#[must_use]
pub fn probability_to_american(q: f64) -> i32 {
    let q = if q.is_nan() { 0.5 } else { clamp_probability(q) };
    let price = if q >= 0.5 {
        -100.0 * q / (1.0 - q)
    } else {
        100.0 * (1.0 - q) / q
    };
    // Bounded by the clamp to about 1e8 in magnitude.
    price.round() as i32
}
