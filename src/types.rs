use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};

/// borrower input for a single simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub net_salary: Money,
    pub requested_amount: Money,
}

impl LoanRequest {
    /// build a validated request
    pub fn new(net_salary: Money, requested_amount: Money) -> Result<Self> {
        let request = Self {
            net_salary,
            requested_amount,
        };
        request.validate()?;
        Ok(request)
    }

    /// build a validated request from raw floats
    pub fn from_f64(net_salary: f64, requested_amount: f64) -> Result<Self> {
        let net_salary = Money::from_f64(net_salary)
            .ok_or(SimulationError::UnrepresentableInput { field: "net_salary" })?;
        let requested_amount = Money::from_f64(requested_amount)
            .ok_or(SimulationError::UnrepresentableInput { field: "requested_amount" })?;
        Self::new(net_salary, requested_amount)
    }

    /// first failing field, if any
    pub fn validate(&self) -> Result<()> {
        match self.field_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// every failing field, so a form can flag them together
    pub fn field_errors(&self) -> Vec<SimulationError> {
        let mut errors = Vec::new();

        if let Err(e) = check_net_salary(self.net_salary) {
            errors.push(e);
        }
        if let Err(e) = check_requested_amount(self.requested_amount) {
            errors.push(e);
        }

        errors
    }
}

pub(crate) fn check_net_salary(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(SimulationError::InvalidNetSalary { amount });
    }
    Ok(())
}

pub(crate) fn check_requested_amount(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(SimulationError::InvalidRequestedAmount { amount });
    }
    Ok(())
}

/// affordability verdict for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub requested_amount: Money,
    pub monthly_payment: Money,
    pub is_eligible: bool,
    /// monthly payment over net salary
    pub salary_percentage: Rate,
    /// largest principal that fits the threshold, zero when eligible
    pub suggested_amount: Money,
}

impl LoanResult {
    /// salary share as a percentage with at most two decimals, e.g. `20.39`
    pub fn salary_percentage_display(&self) -> String {
        self.salary_percentage
            .as_percentage()
            .round_dp(2)
            .normalize()
            .to_string()
    }

    /// salary share capped at 100%, for progress-style displays
    pub fn salary_percentage_capped(&self) -> Rate {
        Rate::from_decimal(self.salary_percentage.as_decimal().min(Decimal::ONE))
    }

    pub fn has_suggestion(&self) -> bool {
        !self.is_eligible && self.suggested_amount.is_positive()
    }
}
