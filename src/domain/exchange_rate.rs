//! Exchange Rates
//!
//! Static reference rates for the currencies GlobalPay quotes, used when the
//! agent cannot provide a live figure.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

/// Mock rate table: (from, to, rate)
const MOCK_RATES: &[(&str, &str, Decimal)] = &[
    ("INR", "USD", dec!(0.012)),
    ("USD", "INR", dec!(83.25)),
    ("INR", "EUR", dec!(0.011)),
    ("EUR", "INR", dec!(90.15)),
    ("USD", "EUR", dec!(0.92)),
    ("EUR", "USD", dec!(1.09)),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Invalid currency code: '{0}'")]
    InvalidCurrency(String),
    #[error("Conversion of {amount} at rate {rate} overflows")]
    Overflow { amount: Decimal, rate: Decimal },
}

/// Where a quoted rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Agent,
    Mock,
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateSource::Agent => write!(f, "agent"),
            RateSource::Mock => write!(f, "mock"),
        }
    }
}

/// A rate for one currency pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    pub last_updated: DateTime<Utc>,
    pub source: RateSource,
}

impl ExchangeRate {
    /// Convert an amount at this rate, rounded to cents
    pub fn convert(&self, amount: Decimal) -> Result<Decimal, RateError> {
        if amount <= Decimal::ZERO {
            return Err(RateError::NonPositiveAmount(amount));
        }
        let product = amount.checked_mul(self.rate).ok_or(RateError::Overflow {
            amount,
            rate: self.rate,
        })?;
        Ok(product.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// Normalize a currency code ("inr " -> "INR")
pub fn normalize_code(code: &str) -> Result<String, RateError> {
    let code = code.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RateError::InvalidCurrency(code));
    }
    Ok(code)
}

/// Look up the mock rate. Same-currency and unknown pairs are 1.
pub fn mock_rate(from: &str, to: &str) -> Result<ExchangeRate, RateError> {
    let from = normalize_code(from)?;
    let to = normalize_code(to)?;

    let rate = MOCK_RATES
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, r)| *r)
        .unwrap_or(Decimal::ONE);

    Ok(ExchangeRate {
        from,
        to,
        rate,
        last_updated: Utc::now(),
        source: RateSource::Mock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pairs() {
        assert_eq!(mock_rate("INR", "USD").unwrap().rate, dec!(0.012));
        assert_eq!(mock_rate("usd", "inr").unwrap().rate, dec!(83.25));
        assert_eq!(mock_rate("EUR", "USD").unwrap().rate, dec!(1.09));
    }

    #[test]
    fn test_unknown_pair_defaults_to_one() {
        let rate = mock_rate("GBP", "JPY").unwrap();
        assert_eq!(rate.rate, Decimal::ONE);
        assert_eq!(rate.source, RateSource::Mock);
        assert_eq!(mock_rate("USD", "USD").unwrap().rate, Decimal::ONE);
    }

    #[test]
    fn test_invalid_codes() {
        assert!(matches!(mock_rate("US", "INR"), Err(RateError::InvalidCurrency(_))));
        assert!(matches!(mock_rate("USD", "1NR"), Err(RateError::InvalidCurrency(_))));
    }

    #[test]
    fn test_convert_rounds_to_cents() {
        let rate = mock_rate("INR", "USD").unwrap();
        // 1234.5 * 0.012 = 14.814
        assert_eq!(rate.convert(dec!(1234.5)).unwrap(), dec!(14.81));

        let rate = mock_rate("USD", "INR").unwrap();
        assert_eq!(rate.convert(dec!(10)).unwrap(), dec!(832.50));
    }

    #[test]
    fn test_convert_rejects_non_positive() {
        let rate = mock_rate("USD", "EUR").unwrap();
        assert!(matches!(rate.convert(Decimal::ZERO), Err(RateError::NonPositiveAmount(_))));
        assert!(rate.convert(dec!(-5)).is_err());
    }

    #[test]
    fn test_convert_overflow_is_error() {
        let rate = mock_rate("USD", "INR").unwrap();
        assert_eq!(
            rate.convert(Decimal::MAX),
            Err(RateError::Overflow {
                amount: Decimal::MAX,
                rate: dec!(83.25),
            })
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(mock_rate("INR", "EUR").unwrap()).unwrap();
        assert_eq!(json["source"], "mock");
        assert!(json.get("lastUpdated").is_some());
    }
}
