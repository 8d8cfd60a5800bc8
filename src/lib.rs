pub mod affordability;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod payments;
pub mod simulation;
pub mod types;

// re-export key types
pub use affordability::{compute_loan, AffordabilityEngine};
pub use config::LoanTerms;
pub use decimal::{Money, Rate};
pub use errors::{Result, SimulationError};
pub use payments::{build_schedule, AmortizationRow, AmortizationSchedule, AmortizationScheduler};
pub use simulation::{simulate, Simulation, SimulationView};
pub use types::{LoanRequest, LoanResult};

// re-export external dependencies that users will need
pub use rust_decimal::Decimal;
