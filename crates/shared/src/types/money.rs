//! Money type in integer minor units with currency tagging.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as integer minor units (e.g. cents) so that balance
//! comparisons are exact. `rust_decimal::Decimal` is used only at the
//! boundary (parsing, rates, percentages) and the result is rounded back
//! into minor units half-up.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Qatari Riyal
    Qar,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Saudi Riyal
    Sar,
    /// UAE Dirham
    Aed,
    /// British Pound
    Gbp,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Returns the number of minor-unit decimal places for this currency.
    #[must_use]
    pub const fn minor_unit_exponent(self) -> u32 {
        match self {
            Self::Jpy => 0,
            _ => 2,
        }
    }

    /// Returns the string representation of the currency code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qar => "QAR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Sar => "SAR",
            Self::Aed => "AED",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "QAR" => Ok(Self::Qar),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "SAR" => Ok(Self::Sar),
            "AED" => Ok(Self::Aed),
            "GBP" => Ok(Self::Gbp),
            "JPY" => Ok(Self::Jpy),
            _ => Err(MoneyError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Errors that can occur in money parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount string is malformed or carries more precision than the
    /// currency's minor unit.
    #[error("Invalid amount {amount:?} for currency {currency}")]
    InvalidAmount {
        /// The rejected input.
        amount: String,
        /// The target currency.
        currency: Currency,
    },

    /// Arithmetic mixed two different currencies without an explicit rate.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: Currency,
        /// Currency of the right operand.
        right: Currency,
    },

    /// The currency code is not supported.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// The operation overflowed the minor-unit representation.
    #[error("Amount overflow")]
    Overflow,
}

/// A monetary amount in integer minor units, tagged with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a money value from minor units (e.g. cents).
    #[must_use]
    pub const fn from_minor(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Parses a decimal string (e.g. `"1000.00"`) into minor units.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the string is not a decimal
    /// number or carries more fractional digits than the currency allows.
    pub fn parse(s: &str, currency: Currency) -> Result<Self, MoneyError> {
        let amount: Decimal = s.trim().parse().map_err(|_| MoneyError::InvalidAmount {
            amount: s.to_string(),
            currency,
        })?;
        Self::from_decimal(amount, currency)
    }

    /// Converts a `Decimal` amount into minor units without rounding.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if the amount has excess
    /// precision, or `MoneyError::Overflow` if it does not fit in i64.
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let exponent = currency.minor_unit_exponent();
        let truncated = amount.round_dp_with_strategy(exponent, RoundingStrategy::ToZero);
        if truncated != amount {
            return Err(MoneyError::InvalidAmount {
                amount: amount.to_string(),
                currency,
            });
        }
        let scale = Decimal::from(10u32.pow(exponent));
        let minor = amount
            .checked_mul(scale)
            .and_then(|scaled| scaled.to_i64())
            .ok_or(MoneyError::Overflow)?;
        Ok(Self { minor, currency })
    }

    /// Converts a `Decimal` amount into minor units, rounding half-up.
    ///
    /// This is the single rounding rule used wherever a rate or percentage
    /// touches an amount.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the amount does not fit in i64.
    pub fn from_decimal_rounded(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let rounded = amount.round_dp_with_strategy(
            currency.minor_unit_exponent(),
            RoundingStrategy::MidpointAwayFromZero,
        );
        Self::from_decimal(rounded, currency)
    }

    /// Returns the amount as a `Decimal` in major units.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.minor, self.currency.minor_unit_exponent())
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.minor
    }

    /// Returns the currency of this amount.
    #[must_use]
    pub const fn currency(self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.minor == 0
    }

    /// Returns true if the amount is strictly negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.minor < 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.minor > 0
    }

    /// Adds two amounts of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` for mixed currencies, `Overflow` on i64
    /// overflow.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.require_same_currency(other)?;
        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self { minor, ..self })
    }

    /// Subtracts an amount of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` for mixed currencies, `Overflow` on i64
    /// overflow.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.require_same_currency(other)?;
        let minor = self
            .minor
            .checked_sub(other.minor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self { minor, ..self })
    }

    /// Multiplies the amount by a decimal rate, rounding half-up to the
    /// currency's minor unit. The currency is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the result does not fit in i64.
    pub fn multiply_by_rate(self, rate: Decimal) -> Result<Self, MoneyError> {
        let product = self
            .to_decimal()
            .checked_mul(rate)
            .ok_or(MoneyError::Overflow)?;
        Self::from_decimal_rounded(product, self.currency)
    }

    /// Converts the amount to another currency with an explicit rate,
    /// rounding half-up to the target currency's minor unit.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the result does not fit in i64.
    pub fn convert(self, rate: Decimal, target: Currency) -> Result<Self, MoneyError> {
        let product = self
            .to_decimal()
            .checked_mul(rate)
            .ok_or(MoneyError::Overflow)?;
        Self::from_decimal_rounded(product, target)
    }

    /// Applies a percentage (e.g. tax or discount rate), rounding half-up
    /// to the currency's minor unit.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the result does not fit in i64.
    pub fn percent(self, rate: Decimal) -> Result<Self, MoneyError> {
        let product = self
            .to_decimal()
            .checked_mul(rate)
            .ok_or(MoneyError::Overflow)?
            / Decimal::ONE_HUNDRED;
        Self::from_decimal_rounded(product, self.currency)
    }

    /// Compares two amounts of the same currency.
    ///
    /// The ordering is total and reflexive within a currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` for mixed currencies.
    pub fn cmp_amount(self, other: Self) -> Result<std::cmp::Ordering, MoneyError> {
        self.require_same_currency(other)?;
        Ok(self.minor.cmp(&other.minor))
    }

    fn require_same_currency(self, other: Self) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.to_decimal(), self.currency)
    }
}
