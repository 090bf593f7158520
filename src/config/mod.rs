//! Configuration loading and validation.
//!
//! Every section is optional; an empty file yields [`Config::default`].
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [books]
//! priority = ["fanduel", "draftkings", "betmgm"]
//! allowed = ["fanduel", "draftkings", "betmgm", "caesars"]
//!
//! [lines]
//! reject_unlisted = true
//!
//! [lines.categories.mlb]
//! batter_hits = { min = 0.5, max = 3.5 }
//!
//! [sides]
//! bucket_markets = ["method", "to_win_by"]
//! named_markets = ["h2h"]
//!
//! [[sides.buckets]]
//! name = "ko"
//! aliases = ["ko/tko", "knockout"]
//!
//! [collection]
//! workers = 4
//! fetch_timeout_ms = 10000
//! ```
//!
//! A `[lines]` table replaces the built-in ranges entirely, and a
//! `[[sides.buckets]]` list replaces the built-in buckets.

mod logging;

use std::path::Path;

use serde::Deserialize;

use crate::aggregate::{BooksConfig, LinePolicy};
use crate::collect::CollectConfig;
use crate::error::{ConfigError, Result};
use crate::normalize::SideConfig;

pub use logging::LoggingConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Book priority and allow-list.
    #[serde(default)]
    pub books: BooksConfig,

    /// Plausible line ranges per category and market.
    #[serde(default)]
    pub lines: LinePolicy,

    /// Outcome buckets and the markets they apply to.
    #[serde(default)]
    pub sides: SideConfig,

    #[serde(default)]
    pub collection: CollectConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Category and market keys under `[lines]` are lower-cased.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.lines.canonicalize();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.books.validate()?;
        self.lines.validate()?;
        self.sides.validate()?;
        self.collection.validate()?;
        Ok(())
    }

    /// Install the global tracing subscriber described by `[logging]`.
    ///
    /// Returns `false` when a subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        self.logging.init()
    }
}
