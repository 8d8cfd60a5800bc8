use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{Result, SimulationError};

/// loan terms applied by the affordability engine
///
/// Defaults describe the personal loan product: 3.2% monthly interest,
/// 12 monthly installments, and installments capped at 40% of net salary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    /// interest charged per month on the outstanding balance
    pub monthly_rate: Rate,
    /// number of monthly installments
    pub term_months: u32,
    /// maximum share of net salary an installment may take
    pub affordability_threshold: Rate,
    /// slack allowed above the threshold before a request is ineligible
    pub eligibility_tolerance: Rate,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self::personal_loan()
    }
}

impl LoanTerms {
    pub const DEFAULT_TERM_MONTHS: u32 = 12;
    /// longest term accepted, fifty years of monthly installments
    pub const MAX_TERM_MONTHS: u32 = 600;

    /// standard personal loan terms
    pub fn personal_loan() -> Self {
        Self {
            monthly_rate: Rate::from_decimal(dec!(0.032)),
            term_months: Self::DEFAULT_TERM_MONTHS,
            affordability_threshold: Rate::from_percentage(40),
            eligibility_tolerance: Rate::from_decimal(dec!(0.000000001)),
        }
    }

    pub fn with_monthly_rate(mut self, rate: Rate) -> Self {
        self.monthly_rate = rate;
        self
    }

    pub fn with_term_months(mut self, months: u32) -> Self {
        self.term_months = months;
        self
    }

    pub fn with_affordability_threshold(mut self, threshold: Rate) -> Self {
        self.affordability_threshold = threshold;
        self
    }

    pub fn with_eligibility_tolerance(mut self, tolerance: Rate) -> Self {
        self.eligibility_tolerance = tolerance;
        self
    }

    /// check the terms keep both annuity formulas well defined
    pub fn validate(&self) -> Result<()> {
        if self.monthly_rate.as_decimal() <= Decimal::ZERO {
            return Err(SimulationError::InvalidConfiguration {
                message: format!("monthly rate must be positive, got {}", self.monthly_rate),
            });
        }

        if self.term_months == 0 || self.term_months > Self::MAX_TERM_MONTHS {
            return Err(SimulationError::InvalidConfiguration {
                message: format!(
                    "term must be between 1 and {} months, got {}",
                    Self::MAX_TERM_MONTHS,
                    self.term_months
                ),
            });
        }

        let threshold = self.affordability_threshold.as_decimal();
        if threshold <= Decimal::ZERO || threshold > Decimal::ONE {
            return Err(SimulationError::InvalidConfiguration {
                message: format!(
                    "affordability threshold must be within (0%, 100%], got {}",
                    self.affordability_threshold
                ),
            });
        }

        if self.eligibility_tolerance.as_decimal() < Decimal::ZERO {
            return Err(SimulationError::InvalidConfiguration {
                message: "eligibility tolerance cannot be negative".to_string(),
            });
        }

        Ok(())
    }

    /// load terms from json, missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let terms: LoanTerms = serde_json::from_str(json).map_err(|e| {
            SimulationError::InvalidConfiguration {
                message: format!("unreadable loan terms: {e}"),
            }
        })?;
        terms.validate()?;
        Ok(terms)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
