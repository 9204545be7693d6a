mod annuity;
mod goal;
mod risk;
mod tax;
mod types;

pub use annuity::{emi, sip, swp};
pub use goal::{DEFAULT_INFLATION_PCT, plan};
pub use risk::{NEUTRAL_SCORE, risk_score};
pub use tax::{income_tax, saving_suggestions};
pub use types::{CalcError, GoalPlan, GoalPolicy, PricePoint, TaxSlab, TaxTable};
