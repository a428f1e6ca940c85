use chrono::NaiveDate;

use crate::decimal::{Money, Rate};
use crate::interest::InterestCalculation;
use crate::period::Period;

/// actual/365 accrual at a fixed annual rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualEngine {
    pub annual_rate: Rate,
}

impl AccrualEngine {
    pub fn new(annual_rate: Rate) -> Self {
        Self { annual_rate }
    }

    /// actual days between two dates, zero if `end` is not after `start`
    pub fn calculate_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        (end - start).num_days().max(0) as u32
    }

    /// interest on `principal` between two dates
    pub fn accrue_between(&self, principal: Money, start: NaiveDate, end: NaiveDate) -> InterestCalculation {
        let days = self.calculate_days(start, end);
        InterestCalculation {
            days,
            interest_amount: principal.apply_rate(self.annual_rate, days),
        }
    }

    /// interest on `principal` over one sub-interval
    pub fn accrue(&self, principal: Money, interval: &Period) -> InterestCalculation {
        self.accrue_between(principal, interval.start(), interval.end())
    }
}
