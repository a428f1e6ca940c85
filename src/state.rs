use serde::{Deserialize, Serialize};

use crate::config::{validate_principal, validate_rate, LoanTerms};
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::payments::Schedule;
use crate::period::Period;

/// outstanding loan: principal, rate and the period still to be scheduled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    principal: Money,
    annual_rate: Rate,
    period: Period,
}

impl LoanState {
    pub fn new(principal: Money, annual_rate: Rate, period: Period) -> Result<Self> {
        validate_principal(principal)?;
        validate_rate(annual_rate)?;
        Ok(Self {
            principal,
            annual_rate,
            period,
        })
    }

    pub fn from_terms(terms: &LoanTerms) -> Result<Self> {
        Self::new(terms.principal, terms.rate(), terms.period()?)
    }

    /// remaining principal, may dip slightly below zero after a final payment
    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn is_settled(&self) -> bool {
        !self.principal.is_positive()
    }

    /// state after paying `schedule`
    ///
    /// Every principal portion is deducted and the period restarts at the
    /// last payment date, keeping its end. An empty schedule changes nothing.
    pub fn applied(&self, schedule: &Schedule) -> Self {
        let Some(last) = schedule.last() else {
            return self.clone();
        };

        let principal = schedule
            .iter()
            .fold(self.principal, |balance, payment| balance - payment.principal());

        Self {
            principal,
            annual_rate: self.annual_rate,
            period: self.period.remaining_from(last.date()),
        }
    }

    /// in-place form of [`LoanState::applied`]
    pub fn apply(&mut self, schedule: &Schedule) {
        *self = self.applied(schedule);
    }
}
