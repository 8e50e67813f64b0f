//! Monetary amounts as produced by the checkout workflow.
//!
//! Amounts arrive as a whole-unit count plus a nano-unit remainder
//! (billionths of a unit), the same shape the pricing and currency services
//! use. [`Money::amount`] turns that pair into an exact [`Decimal`] and
//! [`money_to_string`] renders the canonical two-place text stored on an
//! order record.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of nano-units in one whole unit.
pub const NANOS_PER_UNIT: i32 = 1_000_000_000;

/// Decimal scale of the `nanos` component.
const NANOS_SCALE: u32 = 9;

/// Decimal places in the canonical `total_cost` text.
const CANONICAL_SCALE: u32 = 2;

/// An amount of money in a given currency.
///
/// `nanos` is the fractional part in billionths of a unit. When `units` is
/// non-zero, `nanos` carries the same sign (e.g. -1.75 is `units = -1`,
/// `nanos = -750_000_000`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Three-letter currency code (e.g., "USD").
    pub currency_code: String,
    /// Whole units of the amount.
    pub units: i64,
    /// Nano units (10^-9) of the amount.
    pub nanos: i32,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(currency_code: impl Into<String>, units: i64, nanos: i32) -> Self {
        Self {
            currency_code: currency_code.into(),
            units,
            nanos,
        }
    }

    /// The exact decimal value `units + nanos / 10^9`.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::from(self.units) + Decimal::new(i64::from(self.nanos), NANOS_SCALE)
    }

    /// Whether `nanos` is in range and agrees in sign with `units`.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        if self.nanos <= -NANOS_PER_UNIT || self.nanos >= NANOS_PER_UNIT {
            return false;
        }
        !((self.units > 0 && self.nanos < 0) || (self.units < 0 && self.nanos > 0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", money_to_string(Some(self)), self.currency_code)
    }
}

/// Render an amount as canonical two-place decimal text.
///
/// An absent amount renders as `"0.00"`. Values are rounded half-to-even at
/// the second decimal place, and a result that rounds to zero never carries
/// a minus sign.
///
/// Rounding works on the exact decimal value, so an amount that sits exactly
/// on a sub-cent midpoint always goes to the even cent (`0.165` renders as
/// `"0.16"`). Formatting the nearest binary float instead can land either
/// way depending on representation error (the float nearest `0.165` is
/// slightly above it and would print `"0.17"`).
#[must_use]
pub fn money_to_string(money: Option<&Money>) -> String {
    let Some(money) = money else {
        return "0.00".to_owned();
    };

    let mut rounded = money
        .amount()
        .round_dp_with_strategy(CANONICAL_SCALE, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(CANONICAL_SCALE);
    rounded.to_string()
}

/// Error returned when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("currency code must be three ASCII letters, got {0:?}")]
pub struct CurrencyCodeError(String);

/// A validated ISO 4217-style currency code.
///
/// Always three upper-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code, normalising it to upper case.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyCodeError` unless the input is exactly three ASCII
    /// letters.
    pub fn parse(s: &str) -> Result<Self, CurrencyCodeError> {
        if s.len() != 3 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyCodeError(s.to_owned()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
