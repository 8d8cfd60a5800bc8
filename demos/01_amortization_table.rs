/// amortization table and json export for a simulated loan
use loan_simulator_rs::{AffordabilityEngine, LoanRequest, LoanTerms};
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let engine = AffordabilityEngine::new(LoanTerms::personal_loan())?;
    let request = LoanRequest::from_f64(150_000.0, 300_000.0)?;
    let simulation = engine.simulate(&request)?;

    let schedule = simulation.schedule()?;
    println!("{:>5} {:>14} {:>14} {:>14} {:>14}", "month", "payment", "principal", "interest", "balance");
    for row in &schedule {
        println!(
            "{:>5} {:>14} {:>14} {:>14} {:>14}",
            row.month,
            row.payment.round_dp(2),
            row.principal.round_dp(2),
            row.interest.round_dp(2),
            row.remaining_balance.round_dp(2)
        );
    }
    println!("total interest {}", schedule.total_interest.round_dp(2));

    println!("{}", simulation.view(true)?.to_json_pretty()?);

    Ok(())
}
