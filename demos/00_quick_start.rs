/// quick start - check whether a salary supports a requested loan
use loan_simulator_rs::{simulate, LoanRequest, Money};
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()?;

    let salary = Money::from_major(150_000);

    for amount in [300_000, 800_000] {
        let request = LoanRequest::new(salary, Money::from_major(amount))?;
        let simulation = simulate(&request)?;
        let result = &simulation.result;

        println!(
            "requested {} -> payment {} ({}% of salary)",
            result.requested_amount,
            result.monthly_payment.round_dp(2),
            simulation.salary_percentage_display()
        );

        if result.is_eligible {
            println!("  approved");
        } else if result.has_suggestion() {
            println!("  over the limit, consider up to {}", result.suggested_amount.round_dp(2));
        }
    }

    // field errors are reported together, the way a form shows them
    let blank = LoanRequest {
        net_salary: Money::ZERO,
        requested_amount: Money::ZERO,
    };
    for err in blank.field_errors() {
        println!("invalid input: {err}");
    }

    Ok(())
}
