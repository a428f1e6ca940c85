use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{LoanTerms, RoundingPolicy};
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::payments::{self, Schedule};
use crate::period::Period;
use crate::state::LoanState;

/// amortization calculator for a single loan
///
/// Owns a [`LoanState`]; schedules are computed fresh on every call and only
/// [`Calculator::apply_schedule`] mutates the state.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    state: LoanState,
    rounding: RoundingPolicy,
}

impl Calculator {
    /// create from principal, annual rate in percent and loan period
    pub fn new(principal: Money, annual_rate_percent: Decimal, period: Period) -> Result<Self> {
        let state = LoanState::new(principal, Rate::from_percentage(annual_rate_percent), period)?;
        Ok(Self::from_state(state))
    }

    pub fn from_terms(terms: &LoanTerms) -> Result<Self> {
        Ok(Self::from_state(LoanState::from_terms(terms)?))
    }

    pub fn from_state(state: LoanState) -> Self {
        Self {
            state,
            rounding: RoundingPolicy::default(),
        }
    }

    pub fn builder<'a>() -> CalculatorBuilder<'a> {
        CalculatorBuilder::new()
    }

    /// replace the rounding used by minimal payment estimates
    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn state(&self) -> &LoanState {
        &self.state
    }

    pub fn into_state(self) -> LoanState {
        self.state
    }

    /// schedule over the loan's remaining period
    pub fn payment_schedule(&self, monthly_payment: Money) -> Result<Schedule> {
        let period = *self.state.period();
        self.payment_schedule_for_period(&period, monthly_payment)
    }

    /// schedule over a caller-supplied window, e.g. the next few months
    pub fn payment_schedule_for_period(&self, period: &Period, monthly_payment: Money) -> Result<Schedule> {
        payments::generate_schedule(
            self.state.principal(),
            self.state.annual_rate(),
            monthly_payment,
            period,
        )
    }

    /// deduct the schedule's principal and move the period start to its last payment
    pub fn apply_schedule(&mut self, schedule: &Schedule) {
        self.state.apply(schedule);
        debug!(
            payments = schedule.len(),
            remaining = %self.state.principal(),
            start = %self.state.period().start(),
            "applied payment schedule"
        );
    }

    pub fn remaining_principal(&self) -> Money {
        self.state.principal()
    }

    /// estimated level payment for an arbitrary loan, stepping months from
    /// this loan's period start
    pub fn minimal_payment(&self, principal: Money, period_count: u32, annual_rate_percent: Decimal) -> Result<Money> {
        payments::minimal_payment_with_policy(
            principal,
            period_count,
            Rate::from_percentage(annual_rate_percent),
            self.state.period().start(),
            &self.rounding,
        )
    }

    /// estimated level payment for what is left of this loan
    pub fn minimal_payment_for_remaining(&self, period_count: u32) -> Result<Money> {
        payments::minimal_payment_with_policy(
            self.state.principal(),
            period_count,
            self.state.annual_rate(),
            self.state.period().start(),
            &self.rounding,
        )
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }
}

/// builder for calculators; the start date defaults to today's date from
/// the supplied clock, or the system clock
pub struct CalculatorBuilder<'a> {
    principal: Option<Money>,
    rate_percent: Option<Decimal>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    term_months: Option<u32>,
    rounding: Option<RoundingPolicy>,
    time_provider: Option<&'a SafeTimeProvider>,
}

impl<'a> Default for CalculatorBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CalculatorBuilder<'a> {
    pub fn new() -> Self {
        Self {
            principal: None,
            rate_percent: None,
            start: None,
            end: None,
            term_months: None,
            rounding: None,
            time_provider: None,
        }
    }

    pub fn set_time(mut self, time: &'a SafeTimeProvider) -> Self {
        self.time_provider = Some(time);
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn rate(mut self, annual_rate_percent: Decimal) -> Self {
        self.rate_percent = Some(annual_rate_percent);
        self
    }

    pub fn start(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    pub fn end(mut self, date: NaiveDate) -> Self {
        self.end = Some(date);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = Some(rounding);
        self
    }

    pub fn build(self) -> Result<Calculator> {
        let principal = self.principal.ok_or(CalculatorError::InvalidConfiguration {
            message: "Principal required".to_string(),
        })?;

        let rate_percent = self.rate_percent.ok_or(CalculatorError::InvalidConfiguration {
            message: "Rate required".to_string(),
        })?;

        let start = match (self.start, self.time_provider) {
            (Some(start), _) => start,
            (None, Some(time)) => time.now().date_naive(),
            (None, None) => SafeTimeProvider::new(TimeSource::System).now().date_naive(),
        };

        let period = match (self.end, self.term_months) {
            (Some(end), _) => Period::new(start, end)?,
            (None, Some(months)) => Period::months_from(start, months)?,
            (None, None) => {
                return Err(CalculatorError::InvalidConfiguration {
                    message: "End date or term required".to_string(),
                });
            }
        };

        let calculator = Calculator::new(principal, rate_percent, period)?;
        Ok(match self.rounding {
            Some(rounding) => calculator.with_rounding(rounding),
            None => calculator,
        })
    }
}
