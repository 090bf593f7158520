//! Pricing domain types shared by every pipeline stage.

mod id;
mod market;
mod odds;
mod quote;
mod side;

pub use id::{BookId, EventId};
pub use market::{BookPrice, Derivation, FairMarket, FairSide, ShopMetrics};
pub use odds::{clamp_probability, probability_to_american, AmericanOdds, PROBABILITY_FLOOR};
pub use quote::{NormalizedQuote, OfferKey, RawQuote, RawValue};
pub use side::Side;
