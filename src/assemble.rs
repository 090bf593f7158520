//! Output assembly: joins an offer set, its fair distribution and the
//! shopping view into a [`FairMarket`].

use crate::aggregate::OfferSet;
use crate::devig::FairDistribution;
use crate::domain::{probability_to_american, FairMarket, FairSide, ShopMetrics};
use crate::shop::LineShopper;

/// Build the output record for one priced offer set.
///
/// Sides follow the distribution's canonical order. The complement side of a
/// single-sided market has no basis and, unless some book quoted it, no shop
/// price or offers.
#[must_use]
pub fn assemble_market(
    set: &OfferSet,
    distribution: FairDistribution,
    shopper: &LineShopper<'_>,
) -> FairMarket {
    let key = set.key();
    let sides = distribution
        .sides
        .into_iter()
        .map(|(side, probability)| {
            let quotes = shopper.side(key, &side);
            let shop = quotes.and_then(|q| q.best()).cloned();
            let metrics = shop
                .as_ref()
                .map(|price| ShopMetrics::measure(probability, price.american));
            FairSide {
                fair_american: probability_to_american(probability),
                fair_probability: probability,
                basis: set.get(&side).cloned(),
                shop,
                metrics,
                offers: quotes.map(|q| q.offers().to_vec()).unwrap_or_default(),
                side,
            }
        })
        .collect();

    FairMarket {
        event_id: set.event_id().cloned(),
        subject: key.subject.clone(),
        market_key: key.market_key.clone(),
        line: key.line,
        derivation: distribution.derivation,
        sides,
    }
}
