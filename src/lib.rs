//! Fairline - fair-value pricing for sportsbook player props.
//!
//! Turns raw quotes from many sportsbooks into margin-free ("no-vig")
//! probabilities per proposition, alongside the best price available across
//! every book.
//!
//! # Pipeline
//!
//! - **[`normalize`]** - Raw feed records to canonical quotes (side, line, price)
//! - **[`aggregate`]** - One retained quote per side per proposition, picked by
//!   book priority, with line-plausibility and book allow-list policies
//! - **[`devig`]** - Proportional de-vig for two-way and N-way markets, with a
//!   single-sided fallback
//! - **[`shop`]** - Best price per side across all books
//! - **[`assemble`]** - Output records joining fair value and shop prices
//! - **[`engine`]** - One pass end to end with a drop report
//!
//! # Around the pipeline
//!
//! - [`collect`] - Bounded, time-boxed fetching from a [`collect::QuoteSource`]
//! - [`snapshot`] - Atomically swapped per-category results
//! - [`config`] - TOML configuration and logging setup
//! - [`domain`] - Odds, sides, quotes and market records
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use fairline::domain::{RawQuote, Side};
//! use fairline::engine::PricingEngine;
//!
//! let quotes = vec![
//!     RawQuote::new("Judge", "batter_hits", "Over", 105, "draftkings").with_line("0.5"),
//!     RawQuote::new("Judge", "batter_hits", "Under", -125, "draftkings").with_line("0.5"),
//! ];
//! let outcome = PricingEngine::default().run("mlb", &quotes);
//! let over = outcome.markets[0].probability(&Side::Over).unwrap_or_default();
//! assert!((over - 0.4675).abs() < 1e-4);
//! ```

pub mod aggregate;
pub mod assemble;
pub mod collect;
pub mod config;
pub mod devig;
pub mod domain;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod shop;
pub mod snapshot;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
