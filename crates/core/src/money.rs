//! Money value object (smallest currency unit).

use core::iter::Sum;
use core::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Non-negative amount in cents.
///
/// Arithmetic saturates instead of wrapping. On the wire the amount travels
/// as a decimal number (`10.5`), matching catalog prices and persisted carts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal amount (e.g. `109.95`), rounding to the nearest cent.
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::InvalidAmount("not a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::InvalidAmount("must not be negative"));
        }
        let cents = (amount * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(DomainError::InvalidAmount("out of range"));
        }
        Ok(Self(cents as u64))
    }

    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Unit price times quantity.
    pub fn times(&self, quantity: u64) -> Self {
        Self(self.0.saturating_mul(quantity))
    }

    /// Apply a rate expressed in basis points, rounding half-up to the cent.
    pub fn apply_rate_bps(&self, bps: u32) -> Self {
        let scaled = (self.0 as u128) * (bps as u128) + 5_000;
        let cents = scaled / 10_000;
        Self(u64::try_from(cents).unwrap_or(u64::MAX))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decimal_amounts_round_to_cents() {
        assert_eq!(Money::from_decimal(4.99).unwrap().cents(), 499);
        assert_eq!(Money::from_decimal(109.95).unwrap().cents(), 10_995);
        assert_eq!(Money::from_decimal(0.005).unwrap().cents(), 1);
        assert_eq!(Money::from_decimal(0.0).unwrap(), Money::ZERO);
    }

    #[test]
    fn negative_and_non_finite_amounts_are_rejected() {
        assert!(matches!(
            Money::from_decimal(-0.01),
            Err(DomainError::InvalidAmount(_))
        ));
        assert!(Money::from_decimal(f64::NAN).is_err());
        assert!(Money::from_decimal(f64::INFINITY).is_err());
    }

    #[test]
    fn tax_rate_rounds_half_up() {
        let subtotal = Money::from_cents(10_000);
        assert_eq!(subtotal.apply_rate_bps(800), Money::from_cents(800));

        // 0.08 * 0.06 = 0.0048 -> 0.00; 0.08 * 0.07 = 0.0056 -> 0.01
        assert_eq!(Money::from_cents(6).apply_rate_bps(800), Money::ZERO);
        assert_eq!(Money::from_cents(7).apply_rate_bps(800), Money::from_cents(1));
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Money::from_cents(2_500).to_string(), "25.00");
        assert_eq!(Money::from_cents(499).to_string(), "4.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn serializes_as_decimal_number() {
        let json = serde_json::to_string(&Money::from_cents(1_050)).unwrap();
        assert_eq!(json, "10.5");
        let back: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(back.cents(), 1_050);
        assert!(serde_json::from_str::<Money>("-1").is_err());
    }

    #[test]
    fn arithmetic_saturates() {
        let max = Money::from_cents(u64::MAX);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(max.times(2), max);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any cent amount survives a trip through its decimal form.
        #[test]
        fn cents_survive_decimal_form(cents in 0u64..10_000_000_000u64) {
            let money = Money::from_cents(cents);
            prop_assert_eq!(Money::from_decimal(money.to_decimal()).unwrap(), money);
        }
    }
}
