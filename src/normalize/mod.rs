//! Quote normalization: one raw quote in, one canonical quote (or a
//! rejection reason) out.
//!
//! Everything here is pure. The pipeline drops rejected quotes individually.

mod side;

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{
    AmericanOdds, BookId, EventId, NormalizedQuote, OfferKey, RawQuote, RawValue,
};
use crate::error::QuoteError;

pub use side::{normalize_side, BucketAliases, SideConfig, SideVocabulary};

/// Decimal places lines are quantized to before keying.
pub const LINE_SCALE: u32 = 2;

/// Quantize a line to [`LINE_SCALE`] places so "0.5", "0.50" and 0.5 share a key.
///
/// Returns `Ok(None)` for lineless markets (no value, or blank text).
///
/// # Errors
///
/// Returns [`QuoteError::InvalidLine`] for non-numeric or non-finite values.
pub fn normalize_line(value: Option<&RawValue>) -> Result<Option<Decimal>, QuoteError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let invalid = || QuoteError::InvalidLine {
        value: value.to_string(),
    };

    let decimal = match value {
        RawValue::Int(v) => Decimal::from(*v),
        RawValue::Float(v) => {
            if !v.is_finite() {
                return Err(invalid());
            }
            Decimal::try_from(*v).map_err(|_| invalid())?
        }
        RawValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
            Decimal::from_str(unsigned)
                .or_else(|_| Decimal::from_scientific(unsigned))
                .map_err(|_| invalid())?
        }
    };

    Ok(Some(quantize_line(decimal)))
}

/// Round to [`LINE_SCALE`] places (half away from zero) and strip trailing zeros.
#[must_use]
pub fn quantize_line(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(LINE_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Validate a feed price as a nonzero American-odds integer.
///
/// Accepts integers, integral floats and numeric text with an optional
/// leading `+` ("+120", "-110", "-110.0").
///
/// # Errors
///
/// Returns [`QuoteError::InvalidPrice`] if the price is missing, zero,
/// non-numeric, fractional or outside the `i32` range.
pub fn validate_price(value: Option<&RawValue>) -> Result<AmericanOdds, QuoteError> {
    let invalid = |reason: String| QuoteError::InvalidPrice { reason };

    let Some(value) = value else {
        return Err(invalid("price is missing".into()));
    };

    let integral = match value {
        RawValue::Int(v) => *v,
        RawValue::Float(v) => {
            integral_float(*v).ok_or_else(|| invalid(format!("'{v}' is not an integer")))?
        }
        RawValue::Text(text) => {
            let trimmed = text.trim();
            let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
            match unsigned.parse::<i64>() {
                Ok(v) => v,
                Err(_) => unsigned
                    .parse::<f64>()
                    .ok()
                    .and_then(integral_float)
                    .ok_or_else(|| invalid(format!("'{text}' is not numeric")))?,
            }
        }
    };

    let narrowed =
        i32::try_from(integral).map_err(|_| invalid(format!("{integral} is out of range")))?;
    AmericanOdds::try_new(narrowed)
}

fn integral_float(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= f64::from(i32::MAX) {
        // Range checked above.
        Some(v as i64)
    } else {
        None
    }
}

/// Stateless converter from [`RawQuote`] to [`NormalizedQuote`].
#[derive(Debug, Clone, Default)]
pub struct QuoteNormalizer {
    sides: SideVocabulary,
}

impl QuoteNormalizer {
    /// Create a normalizer with the given side vocabulary.
    #[must_use]
    pub fn new(sides: SideVocabulary) -> Self {
        Self { sides }
    }

    /// Side vocabulary in use.
    #[must_use]
    pub fn sides(&self) -> &SideVocabulary {
        &self.sides
    }

    /// Validate and canonicalize one quote.
    ///
    /// Subjects are trimmed; market keys are trimmed and lower-cased; books
    /// go through [`BookId::canonical`].
    ///
    /// # Errors
    ///
    /// Returns the first [`QuoteError`] found; the quote should be dropped.
    pub fn normalize(&self, raw: &RawQuote) -> Result<NormalizedQuote, QuoteError> {
        let subject = required(&raw.subject, "subject")?;
        let market_key = required(&raw.market_key, "market_key")?.to_lowercase();
        let book = required(&raw.source_book, "source_book")?;

        let price = validate_price(raw.price.as_ref())?;
        let side = self.sides.resolve(&market_key, &raw.side)?;
        let line = normalize_line(raw.line.as_ref())?;

        let event_id = raw
            .event_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(EventId::from);

        Ok(NormalizedQuote {
            key: OfferKey::new(subject, market_key, line),
            event_id,
            side,
            price,
            book: BookId::canonical(book),
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, QuoteError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(QuoteError::MissingField { field })
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use rust_decimal_macros::dec;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn line_spellings_coalesce() {
        let a = normalize_line(Some(&text("0.5"))).unwrap();
        let b = normalize_line(Some(&text("0.50"))).unwrap();
        let c = normalize_line(Some(&RawValue::Float(0.5))).unwrap();
        assert_eq!(a, Some(dec!(0.5)));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.unwrap().to_string(), b.unwrap().to_string());
    }

    #[test]
    fn line_is_quantized_to_two_places() {
        assert_eq!(normalize_line(Some(&text("2.499"))).unwrap(), Some(dec!(2.5)));
        assert_eq!(normalize_line(Some(&text("1.005"))).unwrap(), Some(dec!(1.01)));
        assert_eq!(normalize_line(Some(&RawValue::Int(3))).unwrap(), Some(dec!(3)));
        assert_eq!(normalize_line(Some(&text("+1.5"))).unwrap(), Some(dec!(1.5)));
        assert_eq!(normalize_line(Some(&text("-0.00"))).unwrap(), Some(Decimal::ZERO));
    }

    #[test]
    fn lineless_values() {
        assert_eq!(normalize_line(None).unwrap(), None);
        assert_eq!(normalize_line(Some(&text("  "))).unwrap(), None);
    }

    #[test]
    fn bad_lines_are_rejected() {
        assert!(matches!(
            normalize_line(Some(&text("two and a half"))),
            Err(QuoteError::InvalidLine { .. })
        ));
        assert!(normalize_line(Some(&RawValue::Float(f64::NAN))).is_err());
        assert!(normalize_line(Some(&RawValue::Float(f64::INFINITY))).is_err());
    }

    #[test]
    fn prices_in_every_shape() {
        assert_eq!(validate_price(Some(&RawValue::Int(-110))).unwrap().value(), -110);
        assert_eq!(validate_price(Some(&text("+120"))).unwrap().value(), 120);
        assert_eq!(validate_price(Some(&text(" -105 "))).unwrap().value(), -105);
        assert_eq!(validate_price(Some(&RawValue::Float(150.0))).unwrap().value(), 150);
        assert_eq!(validate_price(Some(&text("-110.0"))).unwrap().value(), -110);
    }

    #[test]
    fn invalid_prices() {
        let cases = [
            None,
            Some(RawValue::Int(0)),
            Some(text("0")),
            Some(text("even")),
            Some(text("")),
            Some(RawValue::Float(-112.5)),
            Some(RawValue::Float(f64::NAN)),
            Some(RawValue::Int(i64::from(i32::MAX) + 1)),
        ];
        for case in cases {
            assert!(
                matches!(
                    validate_price(case.as_ref()),
                    Err(QuoteError::InvalidPrice { .. })
                ),
                "expected InvalidPrice for {case:?}"
            );
        }
    }

    fn raw() -> RawQuote {
        RawQuote::new(" Aaron Judge ", "Batter_Hits", "Over", -120, "Draft Kings")
            .with_line("0.50")
            .with_event("nyy-bos")
    }

    #[test]
    fn normalize_canonicalizes_fields() {
        let quote = QuoteNormalizer::default().normalize(&raw()).unwrap();
        assert_eq!(quote.key, OfferKey::new("Aaron Judge", "batter_hits", Some(dec!(0.5))));
        assert_eq!(quote.side, Side::Over);
        assert_eq!(quote.price.value(), -120);
        assert_eq!(quote.book.as_str(), "draft_kings");
        assert_eq!(quote.event_id, Some(EventId::from("nyy-bos")));
    }

    #[test]
    fn normalize_reports_missing_fields() {
        let mut quote = raw();
        quote.subject = "   ".into();
        assert_eq!(
            QuoteNormalizer::default().normalize(&quote),
            Err(QuoteError::MissingField { field: "subject" })
        );

        let mut quote = raw();
        quote.source_book.clear();
        assert_eq!(
            QuoteNormalizer::default().normalize(&quote),
            Err(QuoteError::MissingField { field: "source_book" })
        );
    }

    #[test]
    fn normalize_rejects_bad_side_and_price() {
        let mut quote = raw();
        quote.side = "push".into();
        assert!(matches!(
            QuoteNormalizer::default().normalize(&quote),
            Err(QuoteError::UnrecognizedSide { .. })
        ));

        let mut quote = raw();
        quote.price = Some(RawValue::Int(0));
        assert!(matches!(
            QuoteNormalizer::default().normalize(&quote),
            Err(QuoteError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn side_resolution_depends_on_market() {
        let normalizer = QuoteNormalizer::default();
        let mov = RawQuote::new("Jon Jones", "Method_Of_Victory", "KO/TKO", 120, "fanduel");
        assert_eq!(
            normalizer.normalize(&mov).unwrap().side,
            Side::Bucket("ko".into())
        );

        let props = RawQuote::new(
            "Jakobi Meyers",
            "player_anytime_td",
            "Jakobi Meyers No",
            -200,
            "caesars",
        );
        assert_eq!(normalizer.normalize(&props).unwrap().side, Side::Under);

        let moneyline = RawQuote::new("NYY @ BOS", "h2h", "Boston Red Sox", -130, "fanduel");
        assert_eq!(
            normalizer.normalize(&moneyline).unwrap().side,
            Side::Named("Boston Red Sox".into())
        );
    }

    #[test]
    fn blank_event_id_is_dropped() {
        let quote = raw().with_event("  ");
        let normalized = QuoteNormalizer::default().normalize(&quote).unwrap();
        assert_eq!(normalized.event_id, None);
    }
}
