use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Reasons a single quote is rejected.
///
/// A rejected quote is dropped on its own; the rest of the batch continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("invalid price: {reason}")]
    InvalidPrice { reason: String },

    #[error("unrecognized side label '{label}'")]
    UnrecognizedSide { label: String },

    #[error("invalid line value '{value}'")]
    InvalidLine { value: String },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("line {line} outside permitted range for {category}/{market_key}")]
    LineOutOfPolicy {
        category: String,
        market_key: String,
        line: Decimal,
    },

    #[error("book '{book}' is not in the allowed book list")]
    BookNotAllowed { book: String },
}

impl QuoteError {
    /// Short stable label used in logs and pass reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPrice { .. } => "invalid_price",
            Self::UnrecognizedSide { .. } => "unrecognized_side",
            Self::InvalidLine { .. } => "invalid_line",
            Self::MissingField { .. } => "missing_field",
            Self::LineOutOfPolicy { .. } => "line_out_of_policy",
            Self::BookNotAllowed { .. } => "book_not_allowed",
        }
    }
}

/// Reasons a whole market is omitted from the output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("insufficient market data: {quoted} side(s) quoted, at least {required} required")]
    InsufficientMarketData { quoted: usize, required: usize },

    #[error("market mixes sides of different kinds")]
    MixedMarketShape,
}

impl MarketError {
    /// Short stable label used in logs and pass reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientMarketData { .. } => "insufficient_market_data",
            Self::MixedMarketShape => "mixed_market_shape",
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("quote source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;
