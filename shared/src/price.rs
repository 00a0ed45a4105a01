//! Price input normalization
//!
//! Clients send prices as JSON numbers or as strings copied from menus
//! ("$1,200.50", "12,50"). Everything normalizes to a positive
//! [`Decimal`] with two fraction digits; anything non-positive or
//! unparsable is a validation error, never a silent zero.

use crate::error::{AppError, ErrorCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw price value as received on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// JSON number (or numeric string accepted by Decimal)
    Numero(Decimal),
    /// Free-form string, possibly with currency symbol and separators
    Texto(String),
}

/// Price normalization failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("price must be a positive amount, got {0}")]
    NotPositive(Decimal),
    #[error("price is not a valid amount: {0:?}")]
    Unparsable(String),
}

impl From<PriceError> for AppError {
    fn from(e: PriceError) -> Self {
        AppError::with_message(ErrorCode::InvalidPrice, e.to_string())
    }
}

impl PriceInput {
    /// Normalize to a positive amount rounded to two fraction digits
    pub fn normalize(&self) -> Result<Decimal, PriceError> {
        let value = match self {
            Self::Numero(d) => *d,
            Self::Texto(s) => parse_price_text(s)?,
        };
        if value <= Decimal::ZERO {
            return Err(PriceError::NotPositive(value));
        }
        Ok(value.round_dp(2))
    }
}

/// Parse a human-entered price string
///
/// Strips currency symbols and whitespace. A comma followed by exactly
/// two trailing digits is a decimal separator ("12,50"); any other
/// comma is a thousands separator ("1,200.50").
fn parse_price_text(s: &str) -> Result<Decimal, PriceError> {
    let cleaned: String = s
        .trim()
        .trim_start_matches(['$', '€'])
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        match cleaned.rsplit_once(',') {
            Some((head, frac)) if frac.len() == 2 && frac.chars().all(|c| c.is_ascii_digit()) => {
                format!("{}.{frac}", head.replace(',', ""))
            }
            _ => cleaned.replace(',', ""),
        }
    } else {
        cleaned.replace(',', "")
    };

    normalized
        .parse::<Decimal>()
        .map_err(|_| PriceError::Unparsable(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_number_passes_through() {
        let input = PriceInput::Numero(dec("12.5"));
        assert_eq!(input.normalize().unwrap(), dec("12.50"));
    }

    #[test]
    fn test_json_number_deserializes() {
        let input: PriceInput = serde_json::from_str("10.99").unwrap();
        assert_eq!(input.normalize().unwrap(), dec("10.99"));
    }

    #[test]
    fn test_currency_symbol_and_thousands() {
        let input: PriceInput = serde_json::from_str("\"$1,200.50\"").unwrap();
        assert_eq!(input.normalize().unwrap(), dec("1200.50"));
    }

    #[test]
    fn test_comma_decimal_separator() {
        let input = PriceInput::Texto("12,50".into());
        assert_eq!(input.normalize().unwrap(), dec("12.50"));
    }

    #[test]
    fn test_rounds_to_two_digits() {
        let input = PriceInput::Texto("3.14159".into());
        assert_eq!(input.normalize().unwrap(), dec("3.14"));
    }

    #[test]
    fn test_zero_rejected() {
        let err = PriceInput::Numero(Decimal::ZERO).normalize().unwrap_err();
        assert!(matches!(err, PriceError::NotPositive(_)));
    }

    #[test]
    fn test_negative_rejected() {
        let err = PriceInput::Texto("-5.00".into()).normalize().unwrap_err();
        assert!(matches!(err, PriceError::NotPositive(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        let err = PriceInput::Texto("gratis".into()).normalize().unwrap_err();
        assert!(matches!(err, PriceError::Unparsable(_)));
    }

    #[test]
    fn test_error_maps_to_invalid_price() {
        let err: AppError = PriceError::Unparsable("x".into()).into();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
    }
}
