//! Money and Currency value objects.
//!
//! All amounts are fixed-point decimals ([`rust_decimal::Decimal`]), never
//! floats. The process-wide rounding policy is half-up to two decimal places
//! ([`MONEY_SCALE`], [`MONEY_ROUNDING`]); every construction, multiplication
//! and division re-rounds through it. Amounts are never negative.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Stable error codes for Money/Currency rule violations.
pub mod codes {
    pub const MONEY_CURRENCY_NOT_SUPPORTED: &str = "MONEY_CURRENCY_NOT_SUPPORTED";
    pub const MONEY_CURRENCY_MISMATCH: &str = "MONEY_CURRENCY_MISMATCH";
    pub const MONEY_AMOUNT_INVALID: &str = "MONEY_AMOUNT_INVALID";
    pub const MONEY_AMOUNT_NEGATIVE: &str = "MONEY_AMOUNT_NEGATIVE";
    pub const MONEY_DIVIDE_BY_ZERO: &str = "MONEY_DIVIDE_BY_ZERO";
    pub const MONEY_SCALE_INVALID: &str = "MONEY_SCALE_INVALID";
}

/// Monetary scale: two decimal places, for every supported currency.
pub const MONEY_SCALE: u32 = 2;

/// Process-wide rounding mode. Half-up; amounts are non-negative, so
/// `MidpointAwayFromZero` matches the conventional HALF_UP behavior.
pub const MONEY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Supported currencies (closed set).
///
/// A sum type rather than a free-form code, so confirm/cancel and price
/// lookups get exhaustive-match safety.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    COP,
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::COP,
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::COP => "COP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::COP => "Colombian Peso",
            Currency::USD => "US Dollar",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound",
            Currency::JPY => "Japanese Yen",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::COP | Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
        }
    }

    /// Resolve a currency from its ISO code.
    pub fn from_code(code: &str) -> DomainResult<Self> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| {
                DomainError::validation(
                    codes::MONEY_CURRENCY_NOT_SUPPORTED,
                    format!("currency not supported: {code}"),
                )
            })
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s)
    }
}

/// Immutable currency-tagged amount.
///
/// Arithmetic between two `Money` values requires equal currencies. Every
/// operation that can change the number of decimal digits re-rounds to
/// [`MONEY_SCALE`] with [`MONEY_ROUNDING`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    currency: Currency,
    amount: Decimal,
}

impl ValueObject for Money {}

impl Money {
    /// Construct from a decimal amount; rejects negatives, rounds to scale 2.
    pub fn new(currency: Currency, amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(
                codes::MONEY_AMOUNT_NEGATIVE,
                format!("amount cannot be negative: {amount}"),
            ));
        }
        Ok(Self { currency, amount }.round(MONEY_SCALE))
    }

    /// Zero in the given currency, at scale 2.
    pub fn zero(currency: Currency) -> Self {
        Self {
            currency,
            amount: Decimal::ZERO,
        }
        .round(MONEY_SCALE)
    }

    /// Parse from a decimal string, e.g. `Money::from_decimal_str(Currency::USD, "10.00")`.
    pub fn from_decimal_str(currency: Currency, amount: &str) -> DomainResult<Self> {
        if amount.trim().is_empty() {
            return Err(DomainError::validation(
                codes::MONEY_AMOUNT_INVALID,
                "amount cannot be blank",
            ));
        }
        let amount = Decimal::from_str(amount.trim()).map_err(|e| {
            DomainError::validation(
                codes::MONEY_AMOUNT_INVALID,
                format!("invalid amount format '{amount}': {e}"),
            )
        })?;
        Self::new(currency, amount)
    }

    /// Parse from a currency code and a decimal string (request boundary form).
    pub fn parse(currency_code: &str, amount: &str) -> DomainResult<Self> {
        let currency = Currency::from_code(currency_code)?;
        Self::from_decimal_str(currency, amount)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    fn ensure_same_currency(&self, other: &Money) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::conflict(
                codes::MONEY_CURRENCY_MISMATCH,
                format!(
                    "currencies do not match: {} and {}",
                    self.currency, other.currency
                ),
            ));
        }
        Ok(())
    }

    pub fn add(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let sum = self.amount.checked_add(other.amount).ok_or_else(|| {
            DomainError::validation(codes::MONEY_AMOUNT_INVALID, "amount overflow in add")
        })?;
        Money::new(self.currency, sum)
    }

    /// Subtraction that would go below zero fails: money is never negative.
    pub fn subtract(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let diff = self.amount.checked_sub(other.amount).ok_or_else(|| {
            DomainError::validation(codes::MONEY_AMOUNT_INVALID, "amount overflow in subtract")
        })?;
        Money::new(self.currency, diff)
    }

    pub fn multiply(&self, factor: Decimal) -> DomainResult<Money> {
        let product = self.amount.checked_mul(factor).ok_or_else(|| {
            DomainError::validation(codes::MONEY_AMOUNT_INVALID, "amount overflow in multiply")
        })?;
        Money::new(self.currency, product)
    }

    pub fn divide(&self, divisor: Decimal) -> DomainResult<Money> {
        if divisor.is_zero() {
            return Err(DomainError::validation(
                codes::MONEY_DIVIDE_BY_ZERO,
                "cannot divide by zero",
            ));
        }
        let quotient = self.amount.checked_div(divisor).ok_or_else(|| {
            DomainError::validation(codes::MONEY_AMOUNT_INVALID, "amount overflow in divide")
        })?;
        Money::new(self.currency, quotient)
    }

    /// Round half-up to `scale` decimal places (exact trailing zeros kept).
    pub fn round(&self, scale: u32) -> Money {
        let mut amount = self.amount.round_dp_with_strategy(scale, MONEY_ROUNDING);
        // round_dp never increases scale; rescale pads exact zeros so the
        // fixed-point representation is stable (2.5 -> 2.50).
        amount.rescale(scale);
        Money {
            currency: self.currency,
            amount,
        }
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(text: &str) -> Money {
        Money::from_decimal_str(Currency::USD, text).unwrap()
    }

    #[test]
    fn construction_rounds_half_up_to_two_decimals() {
        assert_eq!(usd("10.005").amount(), Decimal::new(1001, 2));
        assert_eq!(usd("10.004").amount(), Decimal::new(1000, 2));
        assert_eq!(usd("10").amount().scale(), 2);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = Money::from_decimal_str(Currency::USD, "-1.00").unwrap_err();
        assert_eq!(err.code(), codes::MONEY_AMOUNT_NEGATIVE);
    }

    #[test]
    fn malformed_amount_is_rejected() {
        let err = Money::from_decimal_str(Currency::USD, "ten").unwrap_err();
        assert_eq!(err.code(), codes::MONEY_AMOUNT_INVALID);
        let err = Money::from_decimal_str(Currency::USD, "  ").unwrap_err();
        assert_eq!(err.code(), codes::MONEY_AMOUNT_INVALID);
    }

    #[test]
    fn unknown_currency_code_is_rejected() {
        let err = Money::parse("XXX", "1.00").unwrap_err();
        assert_eq!(err.code(), codes::MONEY_CURRENCY_NOT_SUPPORTED);
    }

    #[test]
    fn add_and_subtract_require_same_currency() {
        let a = usd("10.00");
        let b = Money::from_decimal_str(Currency::EUR, "1.00").unwrap();
        assert_eq!(
            a.add(&b).unwrap_err().code(),
            codes::MONEY_CURRENCY_MISMATCH
        );
        assert_eq!(
            a.subtract(&b).unwrap_err().code(),
            codes::MONEY_CURRENCY_MISMATCH
        );
        assert_eq!(a.add(&usd("2.50")).unwrap(), usd("12.50"));
        assert_eq!(a.subtract(&usd("2.50")).unwrap(), usd("7.50"));
    }

    #[test]
    fn subtract_below_zero_fails() {
        let err = usd("1.00").subtract(&usd("2.00")).unwrap_err();
        assert_eq!(err.code(), codes::MONEY_AMOUNT_NEGATIVE);
    }

    #[test]
    fn multiply_rounds_to_scale() {
        let price = usd("0.33");
        let total = price.multiply(Decimal::from(3)).unwrap();
        assert_eq!(total, usd("0.99"));
        let third = usd("10.00").multiply(Decimal::from_str("0.333").unwrap()).unwrap();
        assert_eq!(third, usd("3.33"));
    }

    #[test]
    fn divide_by_zero_fails() {
        let err = usd("10.00").divide(Decimal::ZERO).unwrap_err();
        assert_eq!(err.code(), codes::MONEY_DIVIDE_BY_ZERO);
        assert_eq!(usd("10.00").divide(Decimal::from(3)).unwrap(), usd("3.33"));
    }

    #[test]
    fn currency_from_code_round_trips() {
        for c in Currency::ALL {
            assert_eq!(Currency::from_code(c.code()).unwrap(), c);
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: round(2) is idempotent.
            #[test]
            fn round_is_idempotent(units in 0u64..1_000_000_000, scale in 0u32..6) {
                let amount = Decimal::new(units as i64, scale);
                let money = Money::new(Currency::USD, amount).unwrap();
                let once = money.round(2);
                prop_assert_eq!(once.round(2), once);
            }

            /// Property: construction never yields a negative amount or a scale above 2.
            #[test]
            fn construction_normalizes(units in 0u64..1_000_000_000, scale in 0u32..6) {
                let amount = Decimal::new(units as i64, scale);
                let money = Money::new(Currency::EUR, amount).unwrap();
                prop_assert!(!money.amount().is_sign_negative());
                prop_assert_eq!(money.amount().scale(), 2);
            }
        }
    }
}
