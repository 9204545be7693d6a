use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single close-price observation. Series order is chronological; the
/// engine never reorders or deduplicates samples.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PricePoint {
    pub timestamp: i64,
    pub close: f64,
}

/// One progressive-tax bracket. `width` is the span of taxable income charged
/// at `rate`, not a cumulative threshold; the terminal slab carries an
/// infinite width.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TaxSlab {
    pub width: f64,
    pub rate: f64,
}

/// Ordered tax brackets, walked lowest slab first. Invariants (the caller's
/// responsibility, not enforced here): widths positive, last width infinite,
/// rates non-decreasing. A table violating them yields nonsensical but
/// well-defined output.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxTable {
    slabs: Vec<TaxSlab>,
}

impl TaxTable {
    pub fn new(slabs: Vec<TaxSlab>) -> Self {
        Self { slabs }
    }

    /// Builds a table from cumulative upper bounds, the way statutory
    /// brackets are usually published, converting each bound into the width
    /// of its own bracket.
    pub fn from_thresholds(brackets: &[(f64, f64)]) -> Self {
        let mut slabs = Vec::with_capacity(brackets.len());
        let mut previous = 0.0;
        for &(upper, rate) in brackets {
            slabs.push(TaxSlab {
                width: (upper - previous).max(0.0),
                rate,
            });
            previous = upper;
        }
        Self { slabs }
    }

    pub fn slabs(&self) -> &[TaxSlab] {
        &self.slabs
    }
}

impl Default for TaxTable {
    /// Indian old-regime ladder: 0-2.5L at 0%, 2.5-5L at 5%, 5-10L at 20%,
    /// everything above at 30%.
    fn default() -> Self {
        Self::from_thresholds(&[
            (250_000.0, 0.0),
            (500_000.0, 0.05),
            (1_000_000.0, 0.20),
            (f64::INFINITY, 0.30),
        ])
    }
}

/// Result record of one goal-planning call. Fresh per call, no identity,
/// immutable once returned.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub future_value: f64,
    pub monthly_sip: f64,
    pub monthly_swp: f64,
}

/// Policy constants for goal planning: the rate assumed while accumulating
/// toward the goal, and the horizon/rate assumed for drawing the corpus down
/// afterwards. Rates are annual percents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GoalPolicy {
    pub accumulation_rate: f64,
    pub withdrawal_years: u32,
    pub withdrawal_rate: f64,
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self {
            accumulation_rate: 12.0,
            withdrawal_years: 10,
            withdrawal_rate: 8.0,
        }
    }
}

/// Why a calculation could not produce a meaningful number. Degenerate inputs
/// are reported instead of being folded into a silent zero, so callers can
/// tell "valid zero" from "computation failed".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("duration must cover at least one month")]
    ZeroDuration,
    #[error("rate produces a degenerate annuity factor")]
    DegenerateRate,
    #[error("arithmetic produced a non-finite result")]
    NonFinite,
}
