use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::period::Period;

/// loan description as supplied by an embedding application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// annual rate in percent, e.g. 12.5
    pub annual_rate_percent: Decimal,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Decimal, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate_percent,
            start,
            end,
        }
    }

    /// parse terms from json
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn rate(&self) -> Rate {
        Rate::from_percentage(self.annual_rate_percent)
    }

    pub fn period(&self) -> Result<Period> {
        Period::new(self.start, self.end)
    }

    /// check principal, rate and period
    pub fn validate(&self) -> Result<()> {
        validate_principal(self.principal)?;
        validate_rate(self.rate())?;
        self.period()?;
        Ok(())
    }
}

pub(crate) fn validate_principal(principal: Money) -> Result<()> {
    if !principal.is_positive() {
        return Err(CalculatorError::InvalidPrincipal { principal });
    }
    Ok(())
}

pub(crate) fn validate_rate(rate: Rate) -> Result<()> {
    if rate.is_negative() {
        return Err(CalculatorError::InvalidInterestRate { rate });
    }
    Ok(())
}

/// one rounding bucket: amounts above `threshold` are floored to `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingBucket {
    pub threshold: Money,
    pub step: Money,
}

/// rounding applied to estimated minimal payments
///
/// Buckets are checked in order and the first whose threshold the amount
/// exceeds wins. Amounts below every threshold are left as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    pub buckets: Vec<RoundingBucket>,
}

impl RoundingPolicy {
    /// no rounding at all
    pub fn exact() -> Self {
        Self { buckets: Vec::new() }
    }

    pub fn new(buckets: Vec<RoundingBucket>) -> Result<Self> {
        for bucket in &buckets {
            if !bucket.step.is_positive() {
                return Err(CalculatorError::InvalidConfiguration {
                    message: format!("rounding step must be positive, got {}", bucket.step),
                });
            }
        }
        Ok(Self { buckets })
    }

    pub fn apply(&self, amount: Money) -> Money {
        self.buckets
            .iter()
            .find(|bucket| amount > bucket.threshold)
            .map(|bucket| amount.floor_to(bucket.step))
            .unwrap_or(amount)
    }
}

impl Default for RoundingPolicy {
    /// above 10,000 to the nearest 1,000 below, above 1,000 to the nearest 100 below
    fn default() -> Self {
        Self {
            buckets: vec![
                RoundingBucket {
                    threshold: Money::from_major(10_000),
                    step: Money::from_major(1_000),
                },
                RoundingBucket {
                    threshold: Money::from_major(1_000),
                    step: Money::from_major(100),
                },
            ],
        }
    }
}
