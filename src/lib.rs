pub mod calculator;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod interest;
pub mod payments;
pub mod period;
pub mod state;

// re-export key types
pub use calculator::{Calculator, CalculatorBuilder};
pub use config::{LoanTerms, RoundingBucket, RoundingPolicy};
pub use decimal::{Money, Rate};
pub use errors::{CalculatorError, Result};
pub use interest::{AccrualEngine, InterestCalculation};
pub use payments::{
    generate_schedule, minimal_payment, minimal_payment_with_policy, Payment, Schedule,
    ScheduleSummary,
};
pub use period::{MonthlyIntervals, Period};
pub use state::LoanState;

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
