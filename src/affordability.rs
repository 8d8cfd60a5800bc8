use log::{debug, warn};
use rust_decimal::Decimal;

use crate::config::LoanTerms;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, SimulationError};
use crate::payments::{AmortizationSchedule, AmortizationScheduler};
use crate::simulation::Simulation;
use crate::types::{check_net_salary, check_requested_amount, LoanRequest, LoanResult};

/// salary-based affordability checks for fixed-rate loans
///
/// The engine is a pure function of its [`LoanTerms`]; it holds no state
/// between calls and can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordabilityEngine {
    terms: LoanTerms,
}

impl Default for AffordabilityEngine {
    fn default() -> Self {
        Self {
            terms: LoanTerms::personal_loan(),
        }
    }
}

impl AffordabilityEngine {
    /// create engine from validated terms
    pub fn new(terms: LoanTerms) -> Result<Self> {
        terms.validate()?;
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// scheduler sharing this engine's term
    pub fn scheduler(&self) -> AmortizationScheduler {
        AmortizationScheduler::new(self.terms.term_months)
    }

    /// (1 + r)^n
    pub fn growth_factor(&self) -> Result<Decimal> {
        self.terms
            .monthly_rate
            .growth_factor(self.terms.term_months)
            .ok_or_else(|| overflow("growth factor"))
    }

    /// installment owed per unit of principal, r * f / (f - 1)
    pub fn payment_factor(&self) -> Result<Decimal> {
        let r = self.terms.monthly_rate.as_decimal();
        let f = self.growth_factor()?;

        r.checked_mul(f)
            .and_then(|n| n.checked_div(f - Decimal::ONE))
            .ok_or_else(|| overflow("payment factor"))
    }

    /// widest gap expected between the threshold and the ratio of a
    /// re-submitted suggested amount
    ///
    /// The suggestion is truncated to one money step, which lowers its ratio
    /// by up to `ULP * payment_factor / net_salary` on top of the eligibility
    /// tolerance. For ordinary salaries this stays below 1e-9; for salaries of
    /// a fraction of a unit the truncation dominates.
    pub fn round_trip_tolerance(&self, net_salary: Money) -> Result<Rate> {
        check_net_salary(net_salary)?;

        let tolerance = Money::ULP
            .as_decimal()
            .checked_mul(self.payment_factor()?)
            .and_then(|step| step.checked_div(net_salary.as_decimal()))
            .and_then(|step| step.checked_add(self.terms.eligibility_tolerance.as_decimal()))
            .ok_or_else(|| overflow("round trip tolerance"))?;

        Ok(Rate::from_decimal(tolerance))
    }

    /// monthly payment, affordability verdict and suggested amount
    pub fn compute_loan(&self, net_salary: Money, requested_amount: Money) -> Result<LoanResult> {
        check_net_salary(net_salary)?;
        check_requested_amount(requested_amount)?;

        // EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)
        let payment = requested_amount
            .as_decimal()
            .checked_mul(self.payment_factor()?)
            .ok_or_else(|| overflow("monthly payment"))?;

        let salary_percentage = payment
            .checked_div(net_salary.as_decimal())
            .ok_or_else(|| overflow("salary percentage"))?;

        let limit = self
            .terms
            .affordability_threshold
            .as_decimal()
            .checked_add(self.terms.eligibility_tolerance.as_decimal())
            .ok_or_else(|| overflow("eligibility limit"))?;
        let is_eligible = salary_percentage <= limit;

        let suggested_amount = if is_eligible {
            Money::ZERO
        } else {
            self.max_principal(net_salary)?
        };

        let result = LoanResult {
            requested_amount,
            monthly_payment: Money::from_decimal(payment),
            is_eligible,
            salary_percentage: salary_percentage.into(),
            suggested_amount,
        };

        debug!(
            "loan of {} against salary {}: payment {}, {}% of salary",
            requested_amount,
            net_salary,
            result.monthly_payment,
            result.salary_percentage_display()
        );
        if !is_eligible {
            warn!(
                "payment exceeds {} of salary {}, suggesting {}",
                self.terms.affordability_threshold, net_salary, suggested_amount
            );
        }

        Ok(result)
    }

    /// largest principal whose payment stays within the threshold
    ///
    /// Inverts the annuity formula, P = PMT * ((1 + r)^n - 1) / (r * (1 + r)^n).
    /// The result is truncated to money precision so it never lands above the
    /// threshold when submitted again; see [`Self::round_trip_tolerance`] for
    /// how far below it may land.
    pub fn max_principal(&self, net_salary: Money) -> Result<Money> {
        check_net_salary(net_salary)?;

        let r = self.terms.monthly_rate.as_decimal();
        let f = self.growth_factor()?;
        let max_payment = net_salary.as_decimal() * self.terms.affordability_threshold.as_decimal();

        let principal = r
            .checked_mul(f)
            .and_then(|d| max_payment.checked_mul(f - Decimal::ONE)?.checked_div(d))
            .ok_or_else(|| overflow("suggested amount"))?;

        Ok(Money::from_decimal_floor(principal))
    }

    /// amortization for a result, using this engine's rate and term
    pub fn schedule(&self, result: &LoanResult) -> Result<AmortizationSchedule> {
        self.scheduler().build_schedule(
            result.monthly_payment,
            result.requested_amount,
            self.terms.monthly_rate,
        )
    }

    /// validate and compute a request in one step
    pub fn simulate(&self, request: &LoanRequest) -> Result<Simulation> {
        request.validate()?;
        let result = self.compute_loan(request.net_salary, request.requested_amount)?;
        Ok(Simulation::new(*request, result, self.terms))
    }
}

fn overflow(what: &str) -> SimulationError {
    SimulationError::CalculationError {
        message: format!("{what} overflowed decimal range"),
    }
}

/// compute a loan under the default personal loan terms
pub fn compute_loan(net_salary: Money, requested_amount: Money) -> Result<LoanResult> {
    AffordabilityEngine::default().compute_loan(net_salary, requested_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn salary() -> Money {
        Money::from_major(150_000)
    }

    #[test]
    fn test_growth_factor() {
        let engine = AffordabilityEngine::default();
        let f = engine.growth_factor().unwrap();

        assert!((f - dec!(1.4593396)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_affordable_request() {
        let result = compute_loan(salary(), Money::from_major(300_000)).unwrap();

        assert_eq!(result.requested_amount, Money::from_major(300_000));
        assert_eq!(result.monthly_payment, Money::from_decimal(dec!(30499.56972408)));
        assert!(result.is_eligible);
        assert_eq!(result.suggested_amount, Money::ZERO);
        assert_eq!(result.salary_percentage_display(), "20.33");
    }

    #[test]
    fn test_unaffordable_request() {
        let requested = Money::from_major(800_000);
        let result = compute_loan(salary(), requested).unwrap();

        assert!(!result.is_eligible);
        assert!(result.salary_percentage.as_decimal() > dec!(0.40));
        assert!(result.suggested_amount.is_positive());
        assert!(result.suggested_amount < requested);
        assert_eq!(result.suggested_amount, Money::from_decimal(dec!(590172.2602267)));
    }

    #[test]
    fn test_annuity_identity() {
        let engine = AffordabilityEngine::default();
        let r = engine.terms().monthly_rate.as_decimal();
        let f = engine.growth_factor().unwrap();

        for amount in [1_000, 52_500, 300_000, 1_234_567] {
            let principal = Money::from_major(amount);
            let result = engine.compute_loan(salary(), principal).unwrap();

            let lhs = result.monthly_payment.as_decimal() * (f - Decimal::ONE);
            let rhs = principal.as_decimal() * r * f;
            assert!((lhs - rhs).abs() < dec!(0.000001));
        }
    }

    #[test]
    fn test_suggested_amount_round_trip() {
        let engine = AffordabilityEngine::default();
        let first = engine.compute_loan(salary(), Money::from_major(800_000)).unwrap();

        let again = engine.compute_loan(salary(), first.suggested_amount).unwrap();

        assert!(again.is_eligible);
        assert_eq!(again.suggested_amount, Money::ZERO);
        assert!((again.salary_percentage.as_decimal() - dec!(0.40)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_round_trip_for_small_salaries() {
        let engine = AffordabilityEngine::default();

        for salary in [dec!(0.01), dec!(0.5), dec!(3.75)] {
            let salary = Money::from_decimal(salary);
            let first = engine.compute_loan(salary, Money::from_major(1_000)).unwrap();
            assert!(!first.is_eligible);

            let again = engine.compute_loan(salary, first.suggested_amount).unwrap();
            let gap = (again.salary_percentage.as_decimal() - dec!(0.40)).abs();

            assert!(again.is_eligible, "{salary}");
            let tolerance = engine.round_trip_tolerance(salary).unwrap().as_decimal();
            assert!(gap < tolerance, "{salary}: {gap}");
        }

        // a regular salary keeps the tolerance near the fixed one
        let tolerance = engine.round_trip_tolerance(salary()).unwrap().as_decimal();
        assert!(tolerance < dec!(0.000000002));
    }

    #[test]
    fn test_threshold_boundary() {
        let engine = AffordabilityEngine::default();
        let max = engine.max_principal(salary()).unwrap();

        assert!(engine.compute_loan(salary(), max).unwrap().is_eligible);

        let over = engine.compute_loan(salary(), max + Money::ONE).unwrap();
        assert!(!over.is_eligible);
        assert_eq!(over.suggested_amount, max);
    }

    #[test]
    fn test_suggestion_depends_only_on_salary() {
        let a = compute_loan(salary(), Money::from_major(800_000)).unwrap();
        let b = compute_loan(salary(), Money::from_major(5_000_000)).unwrap();

        assert_eq!(a.suggested_amount, b.suggested_amount);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            compute_loan(Money::ZERO, Money::from_major(300_000)).unwrap_err(),
            SimulationError::InvalidNetSalary { amount: Money::ZERO }
        );
        assert!(matches!(
            compute_loan(Money::from_major(-10), Money::from_major(300_000)),
            Err(SimulationError::InvalidNetSalary { .. })
        ));
        assert!(matches!(
            compute_loan(salary(), Money::ZERO),
            Err(SimulationError::InvalidRequestedAmount { .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let tiny_salary = Money::from_decimal(dec!(0.00000001));
        let huge = Money::from_decimal(Decimal::MAX);

        assert!(matches!(
            compute_loan(tiny_salary, huge),
            Err(SimulationError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_extreme_rate_reports_overflow() {
        // passes validation, but r * (1 + r) leaves the decimal range
        let terms = LoanTerms::from_json(r#"{"monthly_rate":"1000000000000000","term_months":1}"#)
            .unwrap();
        let engine = AffordabilityEngine::new(terms).unwrap();

        assert!(matches!(
            engine.compute_loan(Money::from_major(1_000), Money::from_major(1)),
            Err(SimulationError::CalculationError { .. })
        ));
        assert!(matches!(
            engine.max_principal(Money::from_major(1_000)),
            Err(SimulationError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_huge_tolerance_reports_overflow() {
        let terms =
            LoanTerms::default().with_eligibility_tolerance(Rate::from_decimal(Decimal::MAX));
        let engine = AffordabilityEngine::new(terms).unwrap();

        assert!(matches!(
            engine.compute_loan(salary(), Money::from_major(1_000)),
            Err(SimulationError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let terms = LoanTerms::default().with_monthly_rate(Rate::ZERO);
        assert!(matches!(
            AffordabilityEngine::new(terms),
            Err(SimulationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_custom_terms() {
        let terms = LoanTerms::default()
            .with_term_months(24)
            .with_affordability_threshold(Rate::from_percentage(30));
        let engine = AffordabilityEngine::new(terms).unwrap();

        let result = engine.compute_loan(salary(), Money::from_major(800_000)).unwrap();
        // longer term lowers the installment below the 12 month one
        assert!(result.monthly_payment < Money::from_decimal(dec!(81332.18593087)));

        let schedule = engine.schedule(&result).unwrap();
        assert_eq!(schedule.len(), 24);
        assert_eq!(schedule.balance_after(24), Money::ZERO);
    }

    #[test]
    fn test_schedule_uses_engine_terms() {
        let engine = AffordabilityEngine::default();
        let result = engine.compute_loan(salary(), Money::from_major(300_000)).unwrap();

        let schedule = engine.schedule(&result).unwrap();

        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule.interest_rate, engine.terms().monthly_rate);
        assert_eq!(schedule.get_row(1).unwrap().interest, Money::from_major(9_600));
        assert_eq!(schedule.rows[11].remaining_balance, Money::ZERO);
    }
}
