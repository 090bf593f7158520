//! Builders for raw quotes used across tests.
//!
//! Keeps tests focused on prices and sides rather than struct construction.

use crate::domain::RawQuote;

/// A lineless quote.
pub fn quote(subject: &str, market: &str, side: &str, price: i32, book: &str) -> RawQuote {
    RawQuote::new(subject, market, side, price, book)
}

/// A quote with a line given as text, the way most feeds send it.
pub fn lined(
    subject: &str,
    market: &str,
    line: &str,
    side: &str,
    price: i32,
    book: &str,
) -> RawQuote {
    RawQuote::new(subject, market, side, price, book).with_line(line)
}

/// Over and under `batter_hits` quotes from one book.
pub fn hits_pair(subject: &str, line: &str, over: i32, under: i32, book: &str) -> Vec<RawQuote> {
    vec![
        lined(subject, "batter_hits", line, "Over", over, book),
        lined(subject, "batter_hits", line, "Under", under, book),
    ]
}

/// Method-of-victory bucket quotes for one fighter from one book.
pub fn method_of_victory(subject: &str, prices: &[(&str, i32)], book: &str) -> Vec<RawQuote> {
    prices
        .iter()
        .map(|(side, price)| quote(subject, "method_of_victory", side, *price, book))
        .collect()
}

/// Head-to-head (`h2h`) quotes for one matchup from one book.
pub fn head_to_head(subject: &str, prices: &[(&str, i32)], book: &str) -> Vec<RawQuote> {
    prices
        .iter()
        .map(|(name, price)| quote(subject, "h2h", name, *price, book))
        .collect()
}
