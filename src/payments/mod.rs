pub mod amortization;

pub use amortization::{build_schedule, AmortizationRow, AmortizationSchedule, AmortizationScheduler};
