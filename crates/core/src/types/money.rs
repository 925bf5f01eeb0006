//! Exact monetary amounts using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Money`] amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The input is not a decimal number.
    #[error("invalid monetary amount: {0:?}")]
    Invalid(String),
    /// The input is a float that cannot be represented (NaN or infinite).
    #[error("monetary amount is not finite")]
    NotFinite,
}

/// A monetary amount in the store currency's standard unit.
///
/// Serialized as a decimal string (`"12.50"`), which is what the API's
/// decimal fields accept and emit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Amount from minor units (e.g. pesewas or cents).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    /// Parse a decimal string such as `"12.50"`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Invalid`] if the string is not a decimal number.
    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| MoneyError::Invalid(s.to_owned()))
    }

    /// Convert a JSON float.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::NotFinite`] for NaN or infinities.
    pub fn try_from_f64(value: f64) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        Decimal::try_from(value)
            .map(Self)
            .map_err(|_| MoneyError::NotFinite)
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Amount multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Format with a currency symbol, e.g. `GH₵12.50`.
    #[must_use]
    pub fn display_in(&self, currency: CurrencyCode) -> String {
        format!("{}{self}", currency.symbol())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// ISO 4217 currency codes the store can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    GHS,
    USD,
    EUR,
    GBP,
    NGN,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::GHS => "GH₵",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::NGN => "₦",
        }
    }
}
