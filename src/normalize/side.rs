//! Side label resolution.
//!
//! Feeds label sides inconsistently ("Over", "O", "Yes", "Judge Over 1.5",
//! "Jones wins by KO/TKO"). Resolution runs from most to least specific:
//!
//! 1. exact over/under alias (yes/no count as over/under)
//! 2. exact bucket name or alias
//! 3. "over"/"under"/"yes"/"no" as a whole word inside the label
//! 4. bucket alias inside the label (longest alias wins, then config order)
//! 5. "over"/"under" anywhere inside the label
//!
//! Bucket rules (2 and 4) only run for market keys containing one of the
//! configured bucket-market patterns. Head-to-head market keys skip the rules
//! entirely and keep the label as a named outcome.

use serde::Deserialize;

use crate::domain::Side;
use crate::error::{ConfigError, QuoteError};

const OVER_ALIASES: &[&str] = &["over", "o", "yes", "y", "anytime_td"];
const UNDER_ALIASES: &[&str] = &["under", "u", "no", "n"];

/// A named outcome bucket and the labels that map to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BucketAliases {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl BucketAliases {
    pub fn new(name: &str, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

/// Configuration for side resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SideConfig {
    /// Outcome buckets for multi-outcome markets.
    #[serde(default = "default_buckets")]
    pub buckets: Vec<BucketAliases>,

    /// Market-key substrings that enable bucket resolution.
    #[serde(default = "default_bucket_markets")]
    pub bucket_markets: Vec<String>,

    /// Market keys whose outcomes are named (moneyline, fighter vs fighter).
    #[serde(default = "default_named_markets")]
    pub named_markets: Vec<String>,
}

/// Method-of-victory buckets.
fn default_buckets() -> Vec<BucketAliases> {
    vec![
        BucketAliases::new(
            "ko",
            &["ko", "tko", "ko/tko", "ko or tko", "technical knockout", "knockout"],
        ),
        BucketAliases::new(
            "sub",
            &["submission", "wins by submission", "by submission"],
        ),
        BucketAliases::new("dec", &["decision", "points", "win on points", "by decision"]),
    ]
}

fn default_bucket_markets() -> Vec<String> {
    ["method", "to_win_by", "win_by", "victory_method"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_named_markets() -> Vec<String> {
    vec!["h2h".to_string()]
}

impl Default for SideConfig {
    fn default() -> Self {
        Self {
            buckets: default_buckets(),
            bucket_markets: default_bucket_markets(),
            named_markets: default_named_markets(),
        }
    }
}

impl SideConfig {
    /// Buckets with the default market patterns and no named markets.
    #[must_use]
    pub fn with_buckets(buckets: Vec<BucketAliases>) -> Self {
        Self {
            buckets,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = Vec::with_capacity(self.buckets.len());
        for bucket in &self.buckets {
            let name = bucket.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "sides.buckets.name",
                    reason: "bucket name cannot be empty".into(),
                });
            }
            if name == "over" || name == "under" {
                return Err(ConfigError::InvalidValue {
                    field: "sides.buckets.name",
                    reason: format!("'{name}' is reserved for binary sides"),
                });
            }
            if seen.contains(&name) {
                return Err(ConfigError::InvalidValue {
                    field: "sides.buckets.name",
                    reason: format!("duplicate bucket '{name}'"),
                });
            }
            seen.push(name);
        }

        // An empty pattern would match every market key.
        if self.bucket_markets.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "sides.bucket_markets",
                reason: "market patterns cannot be empty".into(),
            });
        }
        if self.named_markets.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "sides.named_markets",
                reason: "market keys cannot be empty".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    name: String,
    aliases: Vec<String>,
}

fn lowered_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}

/// Lower-cased lookup tables built from a [`SideConfig`].
#[derive(Debug, Clone)]
pub struct SideVocabulary {
    buckets: Vec<Bucket>,
    bucket_markets: Vec<String>,
    named_markets: Vec<String>,
}

impl SideVocabulary {
    #[must_use]
    pub fn new(config: &SideConfig) -> Self {
        let buckets = config
            .buckets
            .iter()
            .map(|b| {
                let name = b.name.trim().to_lowercase();
                let mut aliases: Vec<String> = b
                    .aliases
                    .iter()
                    .map(|a| a.trim().to_lowercase())
                    .filter(|a| !a.is_empty())
                    .collect();
                if !aliases.contains(&name) {
                    aliases.push(name.clone());
                }
                Bucket { name, aliases }
            })
            .collect();
        Self {
            buckets,
            bucket_markets: lowered_all(&config.bucket_markets),
            named_markets: lowered_all(&config.named_markets),
        }
    }

    /// True when bucket aliases apply to quotes of this market.
    #[must_use]
    pub fn buckets_apply(&self, market_key: &str) -> bool {
        let market = market_key.trim().to_lowercase();
        self.bucket_markets.iter().any(|p| market.contains(p.as_str()))
    }

    /// True when this market's outcomes are named rather than resolved.
    #[must_use]
    pub fn is_named_market(&self, market_key: &str) -> bool {
        let market = market_key.trim().to_lowercase();
        self.named_markets.contains(&market)
    }

    /// Resolve a feed label quoted in `market_key` to a canonical side.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::UnrecognizedSide`] when no rule matches.
    pub fn resolve(&self, market_key: &str, label: &str) -> Result<Side, QuoteError> {
        if self.is_named_market(market_key) {
            let name = label.trim();
            if name.is_empty() {
                return Err(QuoteError::UnrecognizedSide {
                    label: label.to_string(),
                });
            }
            return Ok(Side::Named(name.to_string()));
        }
        self.resolve_label(label, self.buckets_apply(market_key))
    }

    fn resolve_label(&self, label: &str, with_buckets: bool) -> Result<Side, QuoteError> {
        let lowered = label.trim().to_lowercase();
        let unrecognized = || QuoteError::UnrecognizedSide {
            label: label.to_string(),
        };
        if lowered.is_empty() {
            return Err(unrecognized());
        }

        if OVER_ALIASES.contains(&lowered.as_str()) {
            return Ok(Side::Over);
        }
        if UNDER_ALIASES.contains(&lowered.as_str()) {
            return Ok(Side::Under);
        }

        if with_buckets {
            if let Some(bucket) = self
                .buckets
                .iter()
                .find(|b| b.aliases.iter().any(|a| *a == lowered))
            {
                return Ok(Side::Bucket(bucket.name.clone()));
            }
        }

        let mut words = lowered.split(|c: char| !c.is_alphanumeric());
        if let Some(side) = words.find_map(|w| match w {
            "over" | "yes" => Some(Side::Over),
            "under" | "no" => Some(Side::Under),
            _ => None,
        }) {
            return Ok(side);
        }

        if with_buckets {
            if let Some(bucket) = self.longest_partial_bucket(&lowered) {
                return Ok(Side::Bucket(bucket.to_string()));
            }
        }

        if lowered.contains("over") {
            return Ok(Side::Over);
        }
        if lowered.contains("under") {
            return Ok(Side::Under);
        }

        Err(unrecognized())
    }

    fn longest_partial_bucket(&self, lowered: &str) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for bucket in &self.buckets {
            for alias in &bucket.aliases {
                if lowered.contains(alias.as_str()) {
                    let longer = best.map_or(true, |(_, len)| alias.len() > len);
                    if longer {
                        best = Some((bucket.name.as_str(), alias.len()));
                    }
                }
            }
        }
        best.map(|(name, _)| name)
    }
}

impl Default for SideVocabulary {
    fn default() -> Self {
        Self::new(&SideConfig::default())
    }
}

/// Resolve a side label with the default vocabulary and no market context.
///
/// Every rule applies, buckets included. Quotes in the pipeline go through
/// [`SideVocabulary::resolve`], which only tries buckets for bucket markets.
///
/// # Errors
///
/// Returns [`QuoteError::UnrecognizedSide`] when no rule matches.
pub fn normalize_side(label: &str) -> Result<Side, QuoteError> {
    SideVocabulary::default().resolve_label(label, true)
}
