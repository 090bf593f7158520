//! Book and line policies applied while folding quotes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::{BookId, OfferKey};
use crate::error::{ConfigError, QuoteError};

/// Book selection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BooksConfig {
    /// Books in descending priority. Used both to pick the quote that feeds
    /// fair computation and to break best-price ties.
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,

    /// Only quotes from these books are considered. `None` allows every book.
    #[serde(default)]
    pub allowed: Option<Vec<String>>,
}

/// FanDuel leads: its quote is kept when books duplicate a side.
fn default_priority() -> Vec<String> {
    vec!["fanduel".into(), "draftkings".into(), "betmgm".into()]
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            priority: default_priority(),
            allowed: None,
        }
    }
}

impl BooksConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.priority.iter().any(|b| b.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "books.priority",
                reason: "book names cannot be empty".into(),
            });
        }
        if let Some(allowed) = &self.allowed {
            if allowed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "books.allowed",
                    reason: "allowed list cannot be empty; omit it to allow every book".into(),
                });
            }
        }
        Ok(())
    }
}

/// Fixed ordering over books.
///
/// Listed books rank by position; unlisted books rank after every listed one
/// and among themselves only by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPriority {
    ranked: Vec<BookId>,
}

impl BookPriority {
    #[must_use]
    pub fn new(ranked: Vec<BookId>) -> Self {
        Self { ranked }
    }

    #[must_use]
    pub fn from_config(config: &BooksConfig) -> Self {
        Self::new(config.priority.iter().map(|b| BookId::canonical(b)).collect())
    }

    /// Position of a book in the priority list.
    #[must_use]
    pub fn rank(&self, book: &BookId) -> Option<usize> {
        self.ranked.iter().position(|b| b == book)
    }

    /// Compare priority only. `Less` means `a` ranks ahead of `b`.
    #[must_use]
    pub fn cmp_rank(&self, a: &BookId, b: &BookId) -> Ordering {
        match (self.rank(a), self.rank(b)) {
            (Some(ra), Some(rb)) => ra.cmp(&rb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Total order: priority first, then book id.
    #[must_use]
    pub fn cmp_books(&self, a: &BookId, b: &BookId) -> Ordering {
        self.cmp_rank(a, b).then_with(|| a.cmp(b))
    }

    /// True when `candidate` should displace `incumbent`: strictly better rank.
    #[must_use]
    pub fn prefers(&self, candidate: &BookId, incumbent: &BookId) -> bool {
        self.cmp_rank(candidate, incumbent) == Ordering::Less
    }
}

/// Optional allow-list of books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    allowed: Option<Vec<BookId>>,
}

impl BookFilter {
    #[must_use]
    pub fn from_config(config: &BooksConfig) -> Self {
        Self {
            allowed: config
                .allowed
                .as_ref()
                .map(|books| books.iter().map(|b| BookId::canonical(b)).collect()),
        }
    }

    /// # Errors
    ///
    /// Returns [`QuoteError::BookNotAllowed`] for books outside the list.
    pub fn check(&self, book: &BookId) -> Result<(), QuoteError> {
        match &self.allowed {
            Some(allowed) if !allowed.contains(book) => Err(QuoteError::BookNotAllowed {
                book: book.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Inclusive range of plausible lines for one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LineRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl LineRange {
    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, line: Decimal) -> bool {
        self.min <= line && line <= self.max
    }
}

/// Whitelist of plausible line values per category (league) and market.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinePolicy {
    /// Drop lined quotes whose market has no configured range.
    #[serde(default = "default_reject_unlisted")]
    pub reject_unlisted: bool,

    /// `category -> market_key -> range`.
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<String, BTreeMap<String, LineRange>>,
}

fn default_reject_unlisted() -> bool {
    true
}

fn default_categories() -> BTreeMap<String, BTreeMap<String, LineRange>> {
    let mlb = BTreeMap::from([
        ("batter_hits".to_string(), LineRange::new(dec!(0.5), dec!(3.5))),
        ("batter_home_runs".to_string(), LineRange::new(dec!(0.5), dec!(1.5))),
        ("batter_total_bases".to_string(), LineRange::new(dec!(0.5), dec!(3.5))),
        ("pitcher_strikeouts".to_string(), LineRange::new(dec!(1.5), dec!(12.5))),
    ]);
    BTreeMap::from([("mlb".to_string(), mlb)])
}

impl Default for LinePolicy {
    fn default() -> Self {
        Self {
            reject_unlisted: default_reject_unlisted(),
            categories: default_categories(),
        }
    }
}

impl LinePolicy {
    /// A policy with no ranges that accepts every line.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            reject_unlisted: false,
            categories: BTreeMap::new(),
        }
    }

    /// Add or replace the range for one market.
    #[must_use]
    pub fn with_range(mut self, category: &str, market_key: &str, range: LineRange) -> Self {
        self.categories
            .entry(category.to_lowercase())
            .or_default()
            .insert(market_key.to_lowercase(), range);
        self
    }

    /// Configured range for a market, if any.
    #[must_use]
    pub fn range(&self, category: &str, market_key: &str) -> Option<&LineRange> {
        self.categories
            .get(category)
            .or_else(|| self.categories.get(&category.to_lowercase()))
            .and_then(|markets| markets.get(market_key))
    }

    /// Check a quote's line. Lineless keys always pass.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::LineOutOfPolicy`] when the line is out of range,
    /// or unlisted while `reject_unlisted` is set.
    pub fn check(&self, category: &str, key: &OfferKey) -> Result<(), QuoteError> {
        let Some(line) = key.line else {
            return Ok(());
        };
        let allowed = match self.range(category, &key.market_key) {
            Some(range) => range.contains(line),
            None => !self.reject_unlisted,
        };
        if allowed {
            Ok(())
        } else {
            Err(QuoteError::LineOutOfPolicy {
                category: category.to_string(),
                market_key: key.market_key.clone(),
                line,
            })
        }
    }

    /// Lower-case every category and market key so lookups match
    /// normalized quotes.
    pub(crate) fn canonicalize(&mut self) {
        let categories = std::mem::take(&mut self.categories);
        for (category, markets) in categories {
            let entry = self
                .categories
                .entry(category.trim().to_lowercase())
                .or_default();
            for (market, range) in markets {
                entry.insert(market.trim().to_lowercase(), range);
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (category, markets) in &self.categories {
            for (market, range) in markets {
                if range.min > range.max {
                    return Err(ConfigError::InvalidValue {
                        field: "lines.categories",
                        reason: format!(
                            "{category}.{market}: min {} exceeds max {}",
                            range.min, range.max
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
