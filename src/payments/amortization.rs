use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::validate_rate;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::interest::AccrualEngine;
use crate::period::Period;

/// one scheduled payment
///
/// `amount` always equals `interest + principal`, the principal portion is
/// derived on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    date: NaiveDate,
    amount: Money,
    interest: Money,
    principal: Money,
}

impl Payment {
    pub fn new(date: NaiveDate, amount: Money, interest: Money) -> Self {
        Self {
            date,
            amount,
            interest,
            principal: amount - interest,
        }
    }

    /// due date, the end of the sub-interval it pays for
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn interest(&self) -> Money {
        self.interest
    }

    /// portion that repays debt
    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn is_consistent(&self, tolerance: Money) -> bool {
        self.amount.approx_eq(self.interest + self.principal, tolerance)
    }
}

/// ordered payments produced by a single schedule calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    payments: Vec<Payment>,
}

/// totals over a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub payment_count: usize,
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub first_payment_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, payment: Payment) {
        self.payments.push(payment);
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Payment> {
        self.payments.iter()
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn first(&self) -> Option<&Payment> {
        self.payments.first()
    }

    pub fn last(&self) -> Option<&Payment> {
        self.payments.last()
    }

    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.payments.iter().map(|p| p.interest).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.payments.iter().map(|p| p.principal).sum()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            payment_count: self.len(),
            total_paid: self.total_paid(),
            total_interest: self.total_interest(),
            total_principal: self.total_principal(),
            first_payment_date: self.first().map(|p| p.date),
            last_payment_date: self.last().map(|p| p.date),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Payment;
    type IntoIter = std::slice::Iter<'a, Payment>;

    fn into_iter(self) -> Self::IntoIter {
        self.payments.iter()
    }
}

impl IntoIterator for Schedule {
    type Item = Payment;
    type IntoIter = std::vec::IntoIter<Payment>;

    fn into_iter(self) -> Self::IntoIter {
        self.payments.into_iter()
    }
}

/// fixed-payment schedule over the monthly sub-intervals of `period`
///
/// Stops as soon as the running principal is no longer positive. Each
/// payment is capped at principal plus that month's interest, so the final
/// one settles the loan exactly.
pub fn generate_schedule(
    principal: Money,
    annual_rate: Rate,
    monthly_payment: Money,
    period: &Period,
) -> Result<Schedule> {
    if !monthly_payment.is_positive() {
        return Err(CalculatorError::InvalidPaymentAmount {
            amount: monthly_payment,
        });
    }
    validate_rate(annual_rate)?;

    let engine = AccrualEngine::new(annual_rate);
    let mut schedule = Schedule::new();
    let mut credit = principal;

    for interval in period {
        if !credit.is_positive() {
            break;
        }

        let accrual = engine.accrue(credit, &interval);
        let interest = accrual.interest_amount;
        let amount = monthly_payment.min(credit + interest);
        let payment = Payment::new(interval.end(), amount, interest);

        credit -= payment.principal();

        trace!(
            date = %payment.date(),
            days = accrual.days,
            amount = %amount,
            interest = %interest,
            remaining = %credit,
            "scheduled payment"
        );
        schedule.push(payment);
    }

    debug!(
        payments = schedule.len(),
        start = %period.start(),
        end = %period.end(),
        remaining = %credit,
        "generated payment schedule"
    );

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tolerance() -> Money {
        Money::from_decimal(dec!(0.0001))
    }

    #[test]
    fn test_twelve_month_fixed_payment_schedule() {
        let period = Period::months_from(date(2024, 1, 1), 12).unwrap();
        let schedule = generate_schedule(
            Money::from_major(120_000),
            Rate::from_percentage(dec!(12)),
            Money::from_major(3_000),
            &period,
        )
        .unwrap();

        assert_eq!(schedule.len(), 12);

        let first = schedule.first().unwrap();
        assert_eq!(first.date(), date(2024, 2, 1));
        assert_eq!(first.amount(), Money::from_major(3_000));
        // 120000 * 12 / 100 / 365 * 31
        assert_eq!(first.interest().round_dp(2), Money::from_decimal(dec!(1223.01)));
        assert_eq!(first.principal().round_dp(2), Money::from_decimal(dec!(1776.99)));

        assert_eq!(schedule.last().unwrap().date(), date(2025, 1, 1));
    }

    #[test]
    fn test_payment_capped_when_loan_repaid_early() {
        let period = Period::months_from(date(2024, 1, 1), 3).unwrap();
        let schedule = generate_schedule(
            Money::from_major(1_000),
            Rate::from_percentage(dec!(10)),
            Money::from_major(2_000),
            &period,
        )
        .unwrap();

        assert_eq!(schedule.len(), 1);
        let only = schedule.first().unwrap();
        assert_eq!(only.principal(), Money::from_major(1_000));
        assert_eq!(only.amount(), Money::from_major(1_000) + only.interest());
    }

    #[test]
    fn test_payments_are_consistent_and_balance_declines() {
        let principal = Money::from_major(50_000);
        let period = Period::months_from(date(2023, 11, 30), 24).unwrap();
        let schedule = generate_schedule(
            principal,
            Rate::from_percentage(dec!(7.5)),
            Money::from_major(2_500),
            &period,
        )
        .unwrap();

        assert!(!schedule.is_empty());
        assert!(schedule.len() <= 24);

        let mut balance = principal;
        for payment in &schedule {
            assert!(payment.is_consistent(tolerance()));
            let next = balance - payment.principal();
            assert!(next <= balance);
            balance = next;
        }

        // final balance never goes below zero thanks to the cap
        assert!(!balance.is_negative());
        assert!((principal - schedule.total_principal()).approx_eq(balance, tolerance()));
        assert!(schedule
            .total_paid()
            .approx_eq(schedule.total_interest() + schedule.total_principal(), tolerance()));
    }

    #[test]
    fn test_fully_amortized_loan_ends_at_zero() {
        let principal = Money::from_major(10_000);
        let period = Period::months_from(date(2024, 1, 1), 36).unwrap();
        let schedule = generate_schedule(
            principal,
            Rate::from_percentage(dec!(5)),
            Money::from_major(1_000),
            &period,
        )
        .unwrap();

        assert!(schedule.len() < 36);
        assert!(schedule.total_principal().approx_eq(principal, tolerance()));
        // last payment is the capped remainder
        assert!(schedule.last().unwrap().amount() < Money::from_major(1_000));
    }

    #[test]
    fn test_rejects_non_positive_payment() {
        let period = Period::months_from(date(2024, 1, 1), 12).unwrap();
        for amount in [Money::ZERO, Money::from_major(-100)] {
            let result = generate_schedule(
                Money::from_major(10_000),
                Rate::from_percentage(dec!(5)),
                amount,
                &period,
            );
            assert!(matches!(result, Err(CalculatorError::InvalidPaymentAmount { .. })));
        }
    }

    #[test]
    fn test_rejects_negative_rate() {
        let period = Period::months_from(date(2024, 1, 1), 12).unwrap();
        let result = generate_schedule(
            Money::from_major(10_000),
            Rate::from_percentage(dec!(-1)),
            Money::from_major(500),
            &period,
        );
        assert!(matches!(result, Err(CalculatorError::InvalidInterestRate { .. })));
    }

    #[test]
    fn test_settled_principal_yields_empty_schedule() {
        let period = Period::months_from(date(2024, 1, 1), 12).unwrap();
        let schedule = generate_schedule(
            Money::ZERO,
            Rate::from_percentage(dec!(5)),
            Money::from_major(500),
            &period,
        )
        .unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.summary().last_payment_date, None);
    }

    #[test]
    fn test_summary_and_json() {
        let period = Period::months_from(date(2024, 1, 1), 2).unwrap();
        let schedule = generate_schedule(
            Money::from_major(2_000),
            Rate::from_percentage(dec!(12)),
            Money::from_major(500),
            &period,
        )
        .unwrap();

        let summary = schedule.summary();
        assert_eq!(summary.payment_count, 2);
        assert_eq!(summary.first_payment_date, Some(date(2024, 2, 1)));
        assert_eq!(summary.last_payment_date, Some(date(2024, 3, 1)));
        assert_eq!(summary.total_paid, Money::from_major(1_000));

        let json = schedule.to_json_pretty().unwrap();
        let parsed: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schedule);
    }
}
