use fairline::domain::{FairMarket, Side};

pub const TOLERANCE: f64 = 1e-6;

pub fn assert_prob_near(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

/// Fair probabilities are in (0, 1) and sum to one.
pub fn assert_distribution(market: &FairMarket) {
    for side in &market.sides {
        assert!(
            side.fair_probability > 0.0 && side.fair_probability < 1.0,
            "{} {}: probability {} out of range",
            market.key(),
            side.side,
            side.fair_probability
        );
    }
    assert_prob_near(market.total_probability(), 1.0, TOLERANCE);
}

pub fn side_prob(market: &FairMarket, side: &Side) -> f64 {
    market
        .probability(side)
        .unwrap_or_else(|| panic!("{} has no {side} side", market.key()))
}
