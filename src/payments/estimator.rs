use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{validate_principal, validate_rate, RoundingPolicy};
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::interest::AccrualEngine;
use crate::period::add_months;

/// estimate the smallest level payment repaying `principal` within
/// `period_count` months from `start`, rounded with the default policy
pub fn minimal_payment(
    principal: Money,
    period_count: u32,
    annual_rate: Rate,
    start: NaiveDate,
) -> Result<Money> {
    minimal_payment_with_policy(principal, period_count, annual_rate, start, &RoundingPolicy::default())
}

/// two-pass level payment estimate
///
/// The first pass averages `(principal + cumulative interest) / n` over all
/// months into a rough level payment. The second pass replays the months
/// paying that amount and folds any shortfall back into the result.
///
/// Both passes accrue interest on the original principal, not on the
/// declining balance, so the estimate leans high for long terms.
pub fn minimal_payment_with_policy(
    principal: Money,
    period_count: u32,
    annual_rate: Rate,
    start: NaiveDate,
    rounding: &RoundingPolicy,
) -> Result<Money> {
    if period_count == 0 {
        return Err(CalculatorError::InvalidPeriodCount { count: period_count });
    }
    validate_principal(principal)?;
    validate_rate(annual_rate)?;

    let engine = AccrualEngine::new(annual_rate);
    let n = Decimal::from(period_count);

    let mut cumulative_interest = Money::ZERO;
    let mut running = Money::ZERO;
    for step in 0..period_count {
        cumulative_interest += step_interest(&engine, principal, start, step)?;
        running += (principal + cumulative_interest) / n;
    }
    let approximation = running / n;

    let mut remaining = principal;
    let mut paid = Money::ZERO;
    for step in 0..period_count {
        let interest = step_interest(&engine, principal, start, step)?;
        remaining -= approximation - interest;
        paid += approximation;
    }

    let estimate = if remaining.is_positive() {
        (paid + remaining) / n
    } else {
        (paid / n).min(principal)
    };

    let rounded = rounding.apply(estimate);
    debug!(
        principal = %principal,
        periods = period_count,
        approximation = %approximation,
        shortfall = %remaining.max(Money::ZERO),
        estimate = %estimate,
        rounded = %rounded,
        "estimated minimal payment"
    );

    Ok(rounded)
}

/// interest on `principal` for month `step` counted from `start`
fn step_interest(engine: &AccrualEngine, principal: Money, start: NaiveDate, step: u32) -> Result<Money> {
    let current = add_months(start, step)?;
    let next = add_months(current, 1)?;
    Ok(engine.accrue_between(principal, current, next).interest_amount)
}
