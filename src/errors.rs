use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug, PartialEq)]
pub enum SimulationError {
    #[error("invalid net salary: {amount} must be greater than zero")]
    InvalidNetSalary {
        amount: Money,
    },

    #[error("invalid requested amount: {amount} must be greater than zero")]
    InvalidRequestedAmount {
        amount: Money,
    },

    #[error("{field} is not representable as a decimal amount (NaN, infinite or out of range)")]
    UnrepresentableInput {
        field: &'static str,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("payment {payment} does not cover first month interest {interest}")]
    PaymentBelowInterest {
        payment: Money,
        interest: Money,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },
}

impl SimulationError {
    /// errors the borrower can fix by editing the form
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            SimulationError::InvalidNetSalary { .. }
                | SimulationError::InvalidRequestedAmount { .. }
                | SimulationError::UnrepresentableInput { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
