use std::fmt::Display;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

pub const CURRENCY_SYMBOL: &str = "kr";

/// Number of minor units (øre) in one major unit (krone).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------       Money        ---------------------------------------------------------
/// A monetary amount held as an integer number of minor currency units.
///
/// Menu prices, surcharges, unit prices and totals are all `Money`, so no floating point arithmetic is ever involved in
/// computing what a customer is charged. On the wire, amounts are written in major units (`95`, `12.5`), the way the
/// automation sources and the storefront express them.
///
/// There are no arithmetic operators on `Money`. Sums and products go through the `checked_*` methods, which return
/// `None` on overflow instead of wrapping around.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl TryFrom<f64> for Money {
    type Error = MoneyConversionError;

    /// Converts an amount in major units into `Money`, rounding to the nearest minor unit.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(MoneyConversionError(format!("{value} is not a finite number")));
        }
        let minor = (value * MINOR_UNITS_PER_MAJOR as f64).round();
        if minor.abs() >= i64::MAX as f64 {
            return Err(MoneyConversionError(format!("{value} is too large")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(minor as i64))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / MINOR_UNITS_PER_MAJOR as u64;
        let minor = abs % MINOR_UNITS_PER_MAJOR as u64;
        write!(f, "{sign}{major}.{minor:02} {CURRENCY_SYMBOL}")
    }
}

impl Money {
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn from_major(major: i64) -> Self {
        Self(major * MINOR_UNITS_PER_MAJOR)
    }

    /// The amount in minor units
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_MAJOR as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// The price of `quantity` units at this unit price.
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Self)
    }

    /// Adds up all the amounts. Returns `None` if the total does not fit.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts.into_iter().try_fold(Money::default(), Money::checked_add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_UNITS_PER_MAJOR == 0 {
            serializer.serialize_i64(self.0 / MINOR_UNITS_PER_MAJOR)
        } else {
            serializer.serialize_f64(self.as_major_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let major = f64::deserialize(deserializer)?;
        Money::try_from(major).map_err(de::Error::custom)
    }
}
