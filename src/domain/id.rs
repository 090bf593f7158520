//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bookmaker identifier - newtype for type safety.
///
/// Book ids compare exactly, so callers are expected to construct them from
/// already-canonical values (see [`BookId::canonical`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Create a new `BookId` from a string, unchanged.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a `BookId` from a feed label: trimmed, lower-cased, inner
    /// whitespace replaced by underscores ("Draft Kings" -> "draft_kings").
    #[must_use]
    pub fn canonical(label: &str) -> Self {
        let joined = label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        Self(joined)
    }

    /// Get the book ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Event / context identifier a quote belongs to (a game, a fight card bout).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Create a new `EventId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the event ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_book_is_lowercase_and_underscored() {
        assert_eq!(BookId::canonical("  Draft Kings ").as_str(), "draft_kings");
        assert_eq!(BookId::canonical("FANDUEL").as_str(), "fanduel");
    }

    #[test]
    fn book_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&BookId::from("betmgm")).unwrap();
        assert_eq!(json, "\"betmgm\"");
    }

    #[test]
    fn event_id_display() {
        assert_eq!(EventId::from("evt-1").to_string(), "evt-1");
    }
}
