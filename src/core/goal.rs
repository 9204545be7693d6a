use super::annuity;
use super::types::{CalcError, GoalPlan, GoalPolicy};

/// Inflation assumed when the caller does not supply one, in annual percent.
pub const DEFAULT_INFLATION_PCT: f64 = 6.0;

/// Projects today's cost of a goal to its inflated future value, then sizes
/// the monthly SIP that accumulates it and the monthly SWP the corpus can
/// sustain afterwards under the policy's fixed withdrawal horizon.
pub fn plan(
    current_cost: f64,
    years: u32,
    inflation_pct: f64,
    policy: &GoalPolicy,
) -> Result<GoalPlan, CalcError> {
    let future_value = current_cost * (1.0 + inflation_pct / 100.0).powi(years as i32);
    if !future_value.is_finite() {
        return Err(CalcError::NonFinite);
    }

    let monthly_sip = annuity::sip(future_value, years, policy.accumulation_rate)?;
    let monthly_swp = annuity::swp(
        future_value,
        policy.withdrawal_years,
        policy.withdrawal_rate,
    )?;

    Ok(GoalPlan {
        future_value,
        monthly_sip,
        monthly_swp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn future_value_compounds_inflation_annually() {
        let plan = plan(1_000_000.0, 10, 6.0, &GoalPolicy::default()).expect("benign inputs");
        assert_approx(plan.future_value, 1_000_000.0 * 1.06_f64.powi(10), 1e-6);
        // ~1,790,847 in the worked example.
        assert_approx(plan.future_value, 1_790_847.0, 1.0);
    }

    #[test]
    fn plan_composes_annuity_calls_exactly() {
        let policy = GoalPolicy::default();
        let plan = plan(1_000_000.0, 10, 6.0, &policy).expect("benign inputs");

        // Exact composition, not re-derivation: the plan's fields are the
        // annuity results for its own future value.
        assert_eq!(
            plan.monthly_sip,
            annuity::sip(plan.future_value, 10, 12.0).expect("benign inputs")
        );
        assert_eq!(
            plan.monthly_swp,
            annuity::swp(plan.future_value, 10, 8.0).expect("benign inputs")
        );
    }

    #[test]
    fn policy_overrides_flow_through() {
        let policy = GoalPolicy {
            accumulation_rate: 10.0,
            withdrawal_years: 20,
            withdrawal_rate: 6.0,
        };
        let plan = plan(500_000.0, 5, 4.0, &policy).expect("benign inputs");

        assert_eq!(
            plan.monthly_sip,
            annuity::sip(plan.future_value, 5, 10.0).expect("benign inputs")
        );
        assert_eq!(
            plan.monthly_swp,
            annuity::swp(plan.future_value, 20, 6.0).expect("benign inputs")
        );
    }

    #[test]
    fn zero_years_is_reported() {
        assert_eq!(
            plan(1_000_000.0, 0, 6.0, &GoalPolicy::default()),
            Err(CalcError::ZeroDuration)
        );
    }

    #[test]
    fn zero_inflation_still_plans() {
        let plan = plan(1_000_000.0, 10, 0.0, &GoalPolicy::default()).expect("benign inputs");
        assert_approx(plan.future_value, 1_000_000.0, 1e-9);
    }
}
