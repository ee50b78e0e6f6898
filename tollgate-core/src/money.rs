use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CoreError, CoreResult};

/// ISO 4217 currency codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

/// A monetary amount using decimal arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (dollars, not cents)
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Money {
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    pub const fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub fn from_cents(cents: i64, currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn checked_add(&self, other: &Money) -> CoreResult<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| CoreError::Overflow(format!("{} + {}", self.amount, other.amount)))?;
        Ok(Money::new(amount, self.currency))
    }

    fn ensure_same_currency(&self, other: &Money) -> CoreResult<()> {
        if self.currency != other.currency {
            return Err(CoreError::CurrencyMismatch {
                expected: self.currency,
                actual: other.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency.code())
    }
}
