//! Quote shapes entering the pipeline.
//!
//! - [`RawQuote`] - One bookmaker price as supplied by an upstream adapter
//! - [`RawValue`] - A loosely typed scalar (number or text) from a feed
//! - [`OfferKey`] - Canonical proposition identity after normalization
//! - [`NormalizedQuote`] - A validated quote in the fixed internal shape

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{BookId, EventId};
use super::odds::AmericanOdds;
use super::side::Side;

/// A scalar that feeds deliver either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// One bookmaker price for one side of one proposition.
///
/// Required fields default to empty so that a record missing one still
/// deserializes and is rejected individually by the normalizer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawQuote {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub market_key: String,
    #[serde(default)]
    pub line: Option<RawValue>,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub price: Option<RawValue>,
    #[serde(default)]
    pub source_book: String,
    #[serde(default)]
    pub event_id: Option<String>,
}

impl RawQuote {
    /// Create a lineless quote.
    pub fn new(
        subject: impl Into<String>,
        market_key: impl Into<String>,
        side: impl Into<String>,
        price: impl Into<RawValue>,
        source_book: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            market_key: market_key.into(),
            line: None,
            side: side.into(),
            price: Some(price.into()),
            source_book: source_book.into(),
            event_id: None,
        }
    }

    /// Set the line value.
    #[must_use]
    pub fn with_line(mut self, line: impl Into<RawValue>) -> Self {
        self.line = Some(line.into());
        self
    }

    /// Set the event id.
    #[must_use]
    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }
}

/// Canonical identity of a proposition: (subject, market, normalized line).
///
/// Ordering is total (lineless keys first) so maps keyed by `OfferKey`
/// iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OfferKey {
    pub subject: String,
    pub market_key: String,
    pub line: Option<Decimal>,
}

impl OfferKey {
    pub fn new(
        subject: impl Into<String>,
        market_key: impl Into<String>,
        line: Option<Decimal>,
    ) -> Self {
        Self {
            subject: subject.into(),
            market_key: market_key.into(),
            line,
        }
    }
}

impl fmt::Display for OfferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}/{}@{}", self.subject, self.market_key, line),
            None => write!(f, "{}/{}", self.subject, self.market_key),
        }
    }
}

/// A validated quote in the fixed internal shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuote {
    pub key: OfferKey,
    pub event_id: Option<EventId>,
    pub side: Side,
    pub price: AmericanOdds,
    pub book: BookId,
}
