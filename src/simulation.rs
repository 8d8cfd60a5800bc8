use serde::{Deserialize, Serialize};

use crate::affordability::AffordabilityEngine;
use crate::config::LoanTerms;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::payments::{AmortizationRow, AmortizationScheduler, AmortizationSchedule};
use crate::types::{LoanRequest, LoanResult};

/// a computed request, owned by the caller until the next simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulation {
    pub request: LoanRequest,
    pub result: LoanResult,
    terms: LoanTerms,
}

impl Simulation {
    pub(crate) fn new(request: LoanRequest, result: LoanResult, terms: LoanTerms) -> Self {
        Self {
            request,
            result,
            terms,
        }
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// amortization under the same rate and term the result was computed with
    pub fn schedule(&self) -> Result<AmortizationSchedule> {
        AmortizationScheduler::new(self.terms.term_months).build_schedule(
            self.result.monthly_payment,
            self.result.requested_amount,
            self.terms.monthly_rate,
        )
    }

    pub fn salary_percentage_display(&self) -> String {
        self.result.salary_percentage_display()
    }

    /// serializable snapshot, optionally with the full schedule
    pub fn view(&self, include_schedule: bool) -> Result<SimulationView> {
        let schedule = if include_schedule {
            Some(ScheduleView::from_schedule(&self.schedule()?))
        } else {
            None
        };

        Ok(SimulationView {
            request: RequestView {
                net_salary: self.request.net_salary,
                requested_amount: self.request.requested_amount,
            },
            terms: TermsView {
                monthly_rate: self.terms.monthly_rate,
                term_months: self.terms.term_months,
                affordability_threshold: self.terms.affordability_threshold,
            },
            result: ResultView {
                monthly_payment: self.result.monthly_payment,
                is_eligible: self.result.is_eligible,
                salary_percentage: self.result.salary_percentage,
                salary_percentage_display: self.result.salary_percentage_display(),
                suggested_amount: self.result.suggested_amount,
            },
            schedule,
        })
    }
}

/// validate and compute under the default personal loan terms
pub fn simulate(request: &LoanRequest) -> Result<Simulation> {
    AffordabilityEngine::default().simulate(request)
}

/// serializable view of a simulation
#[derive(Debug, Serialize, Deserialize)]
pub struct SimulationView {
    pub request: RequestView,
    pub terms: TermsView,
    pub result: ResultView,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schedule: Option<ScheduleView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestView {
    pub net_salary: Money,
    pub requested_amount: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TermsView {
    pub monthly_rate: Rate,
    pub term_months: u32,
    pub affordability_threshold: Rate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultView {
    pub monthly_payment: Money,
    pub is_eligible: bool,
    pub salary_percentage: Rate,
    pub salary_percentage_display: String,
    pub suggested_amount: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleView {
    pub rows: Vec<AmortizationRow>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl ScheduleView {
    fn from_schedule(schedule: &AmortizationSchedule) -> Self {
        Self {
            rows: schedule.rows.clone(),
            total_interest: schedule.total_interest,
            total_payment: schedule.total_payment,
        }
    }
}

impl SimulationView {
    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
