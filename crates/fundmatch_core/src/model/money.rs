//! Exact money amounts.
//!
//! # Responsibility
//! - Represent non-negative amounts with two decimal places.
//! - Convert between wire decimals and storage minor units (cents).
//!
//! # Invariants
//! - Stored value is always `>= 0`.
//! - Integer part never exceeds `MAX_INTEGER_DIGITS` digits.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DECIMAL_PLACES: u32 = 2;
const MAX_INTEGER_DIGITS: u32 = 12;

/// Non-negative money amount kept as integer minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Money(i64);

/// Reasons a decimal cannot be turned into [`Money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    Negative,
    TooManyDecimalPlaces,
    TooManyDigits,
}

impl Display for MoneyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "Ensure this value is greater than or equal to 0."),
            Self::TooManyDecimalPlaces => write!(
                f,
                "Ensure that there are no more than {DECIMAL_PLACES} decimal places."
            ),
            Self::TooManyDigits => write!(
                f,
                "Ensure that there are no more than {MAX_INTEGER_DIGITS} digits before the decimal point."
            ),
        }
    }
}

impl Error for MoneyError {}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Builds an amount from minor units. Negative input is rejected.
    pub fn from_minor_units(minor_units: i64) -> Result<Self, MoneyError> {
        if minor_units < 0 {
            return Err(MoneyError::Negative);
        }
        Ok(Self(minor_units))
    }

    /// Builds an amount from whole currency units.
    pub fn from_major_units(major_units: u32) -> Self {
        Self(i64::from(major_units) * 100)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, DECIMAL_PLACES)
    }

    /// Returns `self - other`, or `None` when the result would be negative.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        let value = self.0.checked_sub(other.0)?;
        (value >= 0).then_some(Money(value))
    }

    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative);
        }
        if value.normalize().scale() > DECIMAL_PLACES {
            return Err(MoneyError::TooManyDecimalPlaces);
        }
        if value.trunc() >= Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS)) {
            return Err(MoneyError::TooManyDigits);
        }

        let minor_units = (value * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or(MoneyError::TooManyDigits)?;
        Ok(Self(minor_units))
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

// Wire form is a JSON number.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::try_from(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{Money, MoneyError};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).expect("valid decimal literal")
    }

    #[test]
    fn converts_two_decimal_places_exactly() {
        let money = Money::try_from(dec("1234.56")).expect("valid amount");
        assert_eq!(money.minor_units(), 123_456);
        assert_eq!(money.to_string(), "1234.56");
    }

    #[test]
    fn trailing_zeros_do_not_count_as_extra_places() {
        let money = Money::try_from(dec("10.500")).expect("trailing zero is fine");
        assert_eq!(money.minor_units(), 1_050);
    }

    #[test]
    fn rejects_negative_fractional_and_oversized_values() {
        assert_eq!(Money::try_from(dec("-1")), Err(MoneyError::Negative));
        assert_eq!(
            Money::try_from(dec("0.001")),
            Err(MoneyError::TooManyDecimalPlaces)
        );
        assert_eq!(
            Money::try_from(dec("1000000000000")),
            Err(MoneyError::TooManyDigits)
        );
        assert!(Money::try_from(dec("999999999999.99")).is_ok());
    }

    #[test]
    fn checked_sub_refuses_to_go_negative() {
        let five = Money::from_major_units(5);
        let three = Money::from_major_units(3);
        assert_eq!(five.checked_sub(three), Some(Money::from_major_units(2)));
        assert_eq!(three.checked_sub(five), None);
        assert_eq!(five.checked_sub(five), Some(Money::ZERO));
    }

    #[test]
    fn serializes_as_json_number_and_accepts_strings() {
        let json = serde_json::to_value(Money::from_minor_units(50_025).unwrap()).unwrap();
        assert_eq!(json.as_f64(), Some(500.25));

        let from_number: Money = serde_json::from_value(serde_json::json!(12.5)).unwrap();
        assert_eq!(from_number.minor_units(), 1_250);
        let from_string: Money = serde_json::from_value(serde_json::json!("7.05")).unwrap();
        assert_eq!(from_string.minor_units(), 705);

        let err = serde_json::from_value::<Money>(serde_json::json!(-3)).unwrap_err();
        assert!(err.to_string().contains("greater than or equal to 0"));
    }
}
