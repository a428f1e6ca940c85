pub mod accrual;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;

pub use accrual::AccrualEngine;

/// interest accrued over one sub-interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestCalculation {
    /// elapsed actual days
    pub days: u32,
    /// yearly interest prorated by `days / 365`
    pub interest_amount: Money,
}
