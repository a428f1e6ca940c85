pub mod amortization;
pub mod estimator;

pub use amortization::{generate_schedule, Payment, Schedule, ScheduleSummary};
pub use estimator::{minimal_payment, minimal_payment_with_policy};
