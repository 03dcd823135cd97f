use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::errors::{EngineError, Result};

/// rule splitting a principal into installment amounts
pub trait AmountDistribution: Send + Sync {
    /// split `principal` into exactly `count` positive amounts summing to it
    fn distribute(&self, principal: Money, count: u32) -> Result<Vec<Money>>;
}

/// equal shares truncated to the currency's minimal unit, remainder on the last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EqualShares {
    minor_units: u32,
}

impl EqualShares {
    pub fn new(minor_units: u32) -> Self {
        Self { minor_units }
    }

    pub fn minor_units(&self) -> u32 {
        self.minor_units
    }
}

impl Default for EqualShares {
    fn default() -> Self {
        Self::new(2)
    }
}

impl AmountDistribution for EqualShares {
    fn distribute(&self, principal: Money, count: u32) -> Result<Vec<Money>> {
        if count == 0 {
            return Err(EngineError::schedule("installment count must be at least 1"));
        }
        if !principal.is_positive() {
            return Err(EngineError::schedule(format!(
                "principal must be positive, got {}",
                principal
            )));
        }
        if !principal.is_whole_minor(self.minor_units) {
            return Err(EngineError::schedule(format!(
                "principal {} is not a whole number of {} minor units",
                principal,
                Money::minimal_unit(self.minor_units)
            )));
        }

        let total = principal.as_decimal();
        let out_of_range = || {
            EngineError::schedule(format!(
                "principal {} out of range for {} installments",
                principal, count
            ))
        };

        // shares are truncated, so the remainder added to the last is never negative
        let unit = Money::minimal_unit(self.minor_units).as_decimal();
        let mut share = total
            .checked_div(Decimal::from(count))
            .map(|d| Money::from_decimal(d).truncate_to_minor(self.minor_units).as_decimal())
            .ok_or_else(out_of_range)?;
        // division rounds once the quotient runs out of digits
        if share
            .checked_mul(Decimal::from(count))
            .map_or(true, |all| all > total)
        {
            share -= unit;
        }
        if share <= Decimal::ZERO {
            return Err(EngineError::schedule(format!(
                "principal {} is smaller than {} installments of {}",
                principal,
                count,
                Money::minimal_unit(self.minor_units)
            )));
        }

        let last = share
            .checked_mul(Decimal::from(count - 1))
            .and_then(|head| total.checked_sub(head))
            .ok_or_else(out_of_range)?;

        let share = Money::from_decimal(share);
        let last = Money::from_decimal(last);
        let mut amounts = vec![share; count as usize];
        if let Some(tail) = amounts.last_mut() {
            *tail = last;
        }
        Ok(amounts)
    }
}
