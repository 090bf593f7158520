//! Canonical test configurations.
//!
//! Single source of truth for policies used across tests.

use rust_decimal_macros::dec;

use crate::aggregate::{BookPriority, LinePolicy, LineRange};
use crate::config::Config;
use crate::domain::BookId;
use crate::engine::PricingEngine;

/// Priority list from book labels.
pub fn priority(books: &[&str]) -> BookPriority {
    BookPriority::new(books.iter().map(|b| BookId::canonical(b)).collect())
}

/// Built-in line ranges plus an nfl passing-yards range.
pub fn lines() -> LinePolicy {
    LinePolicy::default().with_range(
        "nfl",
        "player_pass_yds",
        LineRange::new(dec!(150.5), dec!(350.5)),
    )
}

/// Engine with default books and sides and the test line ranges.
pub fn engine() -> PricingEngine {
    PricingEngine::from_config(&Config::default()).with_line_policy(lines())
}

/// Engine that accepts every line.
pub fn permissive_engine() -> PricingEngine {
    PricingEngine::default().with_line_policy(LinePolicy::permissive())
}
