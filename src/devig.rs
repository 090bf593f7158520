//! Margin removal: American prices to a fair probability distribution.
//!
//! Uses proportional (multiplicative) normalization: each side's implied
//! probability divided by the market's total implied probability. Markets
//! with a single binary side fall back to the quoted side's implied
//! probability and its complement. Head-to-head markets with two named
//! outcomes price like over/under.

use crate::aggregate::OfferSet;
use crate::domain::{AmericanOdds, Derivation, Side};
use crate::error::MarketError;

/// Minimum number of quoted buckets for an N-way market.
pub const MIN_BUCKETS: usize = 2;

/// Implied probability of a price, margin included.
#[must_use]
pub fn american_to_probability(price: AmericanOdds) -> f64 {
    price.implied_probability()
}

/// Normalize implied probabilities so they sum to one.
///
/// Callers guarantee every input is positive.
fn normalize(implied: &[f64]) -> Vec<f64> {
    let total: f64 = implied.iter().sum();
    implied.iter().map(|p| p / total).collect()
}

/// Two-way de-vig of mutually exclusive, exhaustive sides.
#[must_use]
pub fn devig_two_way(a: AmericanOdds, b: AmericanOdds) -> (f64, f64) {
    let implied_a = a.implied_probability();
    let implied_b = b.implied_probability();
    let total = implied_a + implied_b;
    (implied_a / total, implied_b / total)
}

/// N-way de-vig over outcome buckets.
///
/// # Errors
///
/// Returns [`MarketError::InsufficientMarketData`] for fewer than
/// [`MIN_BUCKETS`] prices.
pub fn devig_n_way(prices: &[AmericanOdds]) -> Result<Vec<f64>, MarketError> {
    if prices.len() < MIN_BUCKETS {
        return Err(MarketError::InsufficientMarketData {
            quoted: prices.len(),
            required: MIN_BUCKETS,
        });
    }
    let implied: Vec<f64> = prices.iter().map(|p| p.implied_probability()).collect();
    Ok(normalize(&implied))
}

/// Single-sided fallback: `(quoted, complement)` with `complement = 1 - implied`.
#[must_use]
pub fn devig_single_sided(price: AmericanOdds) -> (f64, f64) {
    let implied = price.implied_probability();
    (implied, 1.0 - implied)
}

/// Fair probabilities for every side of one market.
#[derive(Debug, Clone, PartialEq)]
pub struct FairDistribution {
    pub derivation: Derivation,
    /// Probabilities in canonical side order.
    pub sides: Vec<(Side, f64)>,
}

impl FairDistribution {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.sides.iter().map(|(_, p)| p).sum()
    }
}

/// Classify an offer set by shape and de-vig it.
///
/// - over and under quoted: [`Derivation::TwoWay`]
/// - one of over/under quoted: [`Derivation::SingleSided`]
/// - two or more buckets: [`Derivation::NWay`]
/// - two named outcomes: [`Derivation::TwoWay`]; three or more: [`Derivation::NWay`]
///
/// # Errors
///
/// - [`MarketError::InsufficientMarketData`] for an empty set, a lone bucket
///   or a lone named outcome
/// - [`MarketError::MixedMarketShape`] when sides of different kinds share a key
pub fn price_offer_set(set: &OfferSet) -> Result<FairDistribution, MarketError> {
    let binary = set.sides().filter(|(side, _)| side.is_binary()).count();
    let named = set.sides().filter(|(side, _)| side.is_named()).count();
    let buckets = set.len() - binary - named;

    let kinds = [binary, named, buckets].iter().filter(|n| **n > 0).count();
    if kinds > 1 {
        return Err(MarketError::MixedMarketShape);
    }

    if let Some(distribution) = price_binary(set) {
        return Ok(distribution);
    }

    if named == 2 {
        let mut sides = set.sides();
        if let (Some((a, qa)), Some((b, qb))) = (sides.next(), sides.next()) {
            let (p_a, p_b) = devig_two_way(qa.american, qb.american);
            return Ok(FairDistribution {
                derivation: Derivation::TwoWay,
                sides: vec![(a.clone(), p_a), (b.clone(), p_b)],
            });
        }
    }

    let (sides, prices): (Vec<Side>, Vec<AmericanOdds>) = set
        .sides()
        .map(|(side, quote)| (side.clone(), quote.american))
        .unzip();
    let probabilities = devig_n_way(&prices)?;
    Ok(FairDistribution {
        derivation: Derivation::NWay,
        sides: sides.into_iter().zip(probabilities).collect(),
    })
}

fn price_binary(set: &OfferSet) -> Option<FairDistribution> {
    let distribution = match (set.get(&Side::Over), set.get(&Side::Under)) {
        (Some(over), Some(under)) => {
            let (p_over, p_under) = devig_two_way(over.american, under.american);
            FairDistribution {
                derivation: Derivation::TwoWay,
                sides: vec![(Side::Over, p_over), (Side::Under, p_under)],
            }
        }
        (Some(over), None) => {
            let (p_over, p_under) = devig_single_sided(over.american);
            FairDistribution {
                derivation: Derivation::SingleSided,
                sides: vec![(Side::Over, p_over), (Side::Under, p_under)],
            }
        }
        (None, Some(under)) => {
            let (p_under, p_over) = devig_single_sided(under.american);
            FairDistribution {
                derivation: Derivation::SingleSided,
                sides: vec![(Side::Over, p_over), (Side::Under, p_under)],
            }
        }
        (None, None) => return None,
    };
    Some(distribution)
}
