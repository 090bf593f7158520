//! Canonical sides of a proposition.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One wagerable side of a market after normalization.
///
/// Binary props resolve to [`Side::Over`] / [`Side::Under`] (Yes/No included).
/// Multi-outcome props resolve to a configured [`Side::Bucket`]. Head-to-head
/// markets keep each outcome's label (a team or fighter) as a [`Side::Named`].
///
/// The derived ordering (over, under, buckets by name, then named outcomes by
/// label) is the canonical emission order for market sides.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Over,
    Under,
    Bucket(String),
    Named(String),
}

impl Side {
    /// True for over/under (the two sides of a binary prop).
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Over | Self::Under)
    }

    /// True for a head-to-head outcome.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// The other side of a binary prop; `None` otherwise.
    #[must_use]
    pub const fn complement(&self) -> Option<Self> {
        match self {
            Self::Over => Some(Self::Under),
            Self::Under => Some(Self::Over),
            Self::Bucket(_) | Self::Named(_) => None,
        }
    }

    /// Label used in serialized output.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Over => "over",
            Self::Under => "under",
            Self::Bucket(name) | Self::Named(name) => name,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Side {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Buckets and named outcomes share the plain label form, so any label other
/// than "over"/"under" reads back as a [`Side::Bucket`].
impl<'de> Deserialize<'de> for Side {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(match label.as_str() {
            "over" => Self::Over,
            "under" => Self::Under,
            _ => Self::Bucket(label),
        })
    }
}
