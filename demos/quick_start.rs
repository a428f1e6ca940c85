/// quick start - schedule a loan, pay part of it, then re-plan the rest
use amortization_rs::chrono::NaiveDate;
use amortization_rs::{Calculator, Money, Period};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;

    // 120,000 at 12% over one year
    let mut calc = Calculator::new(Money::from_major(120_000), dec!(12), Period::months_from(start, 12)?)?;

    let estimate = calc.minimal_payment_for_remaining(12)?;
    println!("suggested monthly payment: {}", estimate);

    // pay 3,000 for the first quarter
    let quarter = Period::months_from(start, 3)?;
    let paid = calc.payment_schedule_for_period(&quarter, Money::from_major(3_000))?;
    for payment in &paid {
        println!(
            "{}  paid {:>12}  interest {:>12}  principal {:>12}",
            payment.date(),
            payment.amount().round_dp(2),
            payment.interest().round_dp(2),
            payment.principal().round_dp(2),
        );
    }
    calc.apply_schedule(&paid);
    println!("remaining after first quarter: {}", calc.remaining_principal().round_dp(2));

    // then the suggested amount for the rest of the year
    let rest = calc.payment_schedule(estimate)?;
    println!("{}", serde_json::to_string_pretty(&rest.summary())?);

    Ok(())
}
