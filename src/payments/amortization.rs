use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::LoanTerms;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};

/// one month of the amortization table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub remaining_balance: Money,
}

/// amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub monthly_payment: Money,
    pub interest_rate: Rate,
    pub term_months: u32,
    pub rows: Vec<AmortizationRow>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// get row for a given month, counted from 1
    pub fn get_row(&self, month: u32) -> Option<&AmortizationRow> {
        if month == 0 {
            return None;
        }
        self.rows.get((month - 1) as usize)
    }

    /// remaining balance after the given month, principal before the first
    pub fn balance_after(&self, month: u32) -> Money {
        self.get_row(month)
            .map(|r| r.remaining_balance)
            .unwrap_or(self.principal)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AmortizationRow> {
        self.rows.iter()
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = &'a AmortizationRow;
    type IntoIter = std::slice::Iter<'a, AmortizationRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// expands a payment/principal pair into monthly rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmortizationScheduler {
    term_months: u32,
}

impl Default for AmortizationScheduler {
    fn default() -> Self {
        Self::new(LoanTerms::DEFAULT_TERM_MONTHS)
    }
}

impl AmortizationScheduler {
    pub fn new(term_months: u32) -> Self {
        Self { term_months }
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    /// calculate full amortization schedule
    ///
    /// Every month but the last pays `monthly_payment`. The last month pays
    /// off whatever balance is left plus its interest, so the table always
    /// closes at exactly zero.
    pub fn build_schedule(
        &self,
        monthly_payment: Money,
        requested_amount: Money,
        interest_rate: Rate,
    ) -> Result<AmortizationSchedule> {
        self.validate(monthly_payment, requested_amount, interest_rate)?;

        let mut rows = Vec::with_capacity(self.term_months as usize);
        let mut balance = requested_amount;

        for month in 1..=self.term_months {
            let interest = balance * interest_rate;

            let (principal, payment) = if month == self.term_months {
                (balance, balance + interest)
            } else {
                (monthly_payment - interest, monthly_payment)
            };

            balance = (balance - principal).max(Money::ZERO);

            trace!(
                "month {month}: payment {payment}, principal {principal}, interest {interest}, balance {balance}"
            );

            rows.push(AmortizationRow {
                month,
                payment,
                principal,
                interest,
                remaining_balance: balance,
            });
        }

        let total_interest: Money = rows.iter().map(|r| r.interest).sum();
        let total_payment: Money = rows.iter().map(|r| r.payment).sum();

        debug!(
            "built {}-month schedule for {requested_amount} at {interest_rate}: total interest {total_interest}",
            self.term_months
        );

        Ok(AmortizationSchedule {
            principal: requested_amount,
            monthly_payment,
            interest_rate,
            term_months: self.term_months,
            rows,
            total_interest,
            total_payment,
        })
    }

    fn validate(
        &self,
        monthly_payment: Money,
        requested_amount: Money,
        interest_rate: Rate,
    ) -> Result<()> {
        if self.term_months == 0 || self.term_months > LoanTerms::MAX_TERM_MONTHS {
            return Err(SimulationError::InvalidConfiguration {
                message: format!(
                    "term must be between 1 and {} months, got {}",
                    LoanTerms::MAX_TERM_MONTHS,
                    self.term_months
                ),
            });
        }

        if !monthly_payment.is_positive() {
            return Err(SimulationError::InvalidPaymentAmount {
                amount: monthly_payment,
            });
        }

        if !requested_amount.is_positive() {
            return Err(SimulationError::InvalidRequestedAmount {
                amount: requested_amount,
            });
        }

        if interest_rate < Rate::ZERO {
            return Err(SimulationError::InvalidInterestRate { rate: interest_rate });
        }

        // a payment that never outgrows the interest would grow the balance
        let first_interest = requested_amount
            .as_decimal()
            .checked_mul(interest_rate.as_decimal())
            .map(Money::from_decimal)
            .ok_or_else(|| SimulationError::CalculationError {
                message: "first month interest overflowed decimal range".to_string(),
            })?;
        if monthly_payment <= first_interest {
            return Err(SimulationError::PaymentBelowInterest {
                payment: monthly_payment,
                interest: first_interest,
            });
        }

        Ok(())
    }
}

/// build a schedule over the default 12-month term
pub fn build_schedule(
    monthly_payment: Money,
    requested_amount: Money,
    interest_rate: Rate,
) -> Result<AmortizationSchedule> {
    AmortizationScheduler::default().build_schedule(monthly_payment, requested_amount, interest_rate)
}
