use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// maximum scale carried by any amount
pub const MAX_SCALE: u32 = 8;

/// Money type, exact decimal with at most 8 fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(MAX_SCALE))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s.trim())?.round_dp(MAX_SCALE)))
    }

    /// create from integer amount (dollars, reais, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (cents with scale 2)
    pub fn from_minor(amount: i64, scale: u32) -> Self {
        Money::from_decimal(Decimal::new(amount, scale.min(MAX_SCALE)))
    }

    /// smallest representable unit for the given number of minor digits
    pub fn minimal_unit(minor_units: u32) -> Self {
        Money(Decimal::new(1, minor_units.min(MAX_SCALE)))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// drop digits beyond the given number of minor digits
    pub fn truncate_to_minor(&self, minor_units: u32) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(minor_units.min(MAX_SCALE), RoundingStrategy::ToZero),
        )
    }

    /// representable in whole minimal units
    pub fn is_whole_minor(&self, minor_units: u32) -> bool {
        self.truncate_to_minor(minor_units) == *self
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(MAX_SCALE))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + *x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12345679"); // rounded to 8 places
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::from_minor(12_345, 2), Money::from_decimal(dec!(123.45)));
        assert_eq!(Money::minimal_unit(2), Money::from_decimal(dec!(0.01)));
        assert_eq!(Money::minimal_unit(0), Money::ONE);
    }

    #[test]
    fn test_truncate_to_minor() {
        assert_eq!(Money::from_decimal(dec!(0.129)).truncate_to_minor(2), Money::from_decimal(dec!(0.12)));
        assert_eq!(Money::from_decimal(dec!(333.3333)).truncate_to_minor(2).to_string(), "333.33");
        assert_eq!(Money::from_decimal(dec!(-0.129)).truncate_to_minor(2), Money::from_decimal(dec!(-0.12)));
    }

    #[test]
    fn test_whole_minor() {
        assert!(Money::from_decimal(dec!(100.50)).is_whole_minor(2));
        assert!(Money::from_decimal(dec!(100.500)).is_whole_minor(2));
        assert!(!Money::from_decimal(dec!(100.005)).is_whole_minor(2));
        assert!(!Money::from_decimal(dec!(1.5)).is_whole_minor(0));
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::from_major(1).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(Money::from_major(-1).is_negative());
    }

    #[test]
    fn test_sum() {
        let parts = vec![
            Money::from_decimal(dec!(333.33)),
            Money::from_decimal(dec!(333.33)),
            Money::from_decimal(dec!(333.34)),
        ];
        let total: Money = parts.iter().sum();
        assert_eq!(total, Money::from_major(1000));
    }
}
