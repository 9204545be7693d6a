use super::types::CalcError;

/// Converts an annual percent rate and a whole-year horizon into the monthly
/// fractional rate and month count shared by all three formulas.
fn monthly_terms(rate_pct: f64, years: u32) -> Result<(f64, f64), CalcError> {
    if years == 0 {
        return Err(CalcError::ZeroDuration);
    }
    if !rate_pct.is_finite() {
        return Err(CalcError::NonFinite);
    }
    Ok((rate_pct / 1200.0, f64::from(years) * 12.0))
}

fn growth_factor(monthly_rate: f64, months: f64) -> Result<f64, CalcError> {
    let factor = (1.0 + monthly_rate).powf(months);
    if !factor.is_finite() {
        return Err(CalcError::NonFinite);
    }
    Ok(factor)
}

fn finite(value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite)
    }
}

/// Monthly contribution that compounds to `target` over `years` at an annual
/// rate of `rate_pct` percent: `target * i / ((1+i)^n - 1)`.
///
/// A zero rate collapses the annuity factor and is reported as
/// `DegenerateRate` rather than returning a number that merely looks valid.
pub fn sip(target: f64, years: u32, rate_pct: f64) -> Result<f64, CalcError> {
    let (i, n) = monthly_terms(rate_pct, years)?;
    let denominator = growth_factor(i, n)? - 1.0;
    if denominator.abs() <= f64::EPSILON {
        return Err(CalcError::DegenerateRate);
    }
    finite(target * i / denominator)
}

/// Monthly withdrawal that exhausts `corpus` over `years` while the remainder
/// grows at `rate_pct` percent: `corpus * i / (1 - (1+i)^-n)`.
pub fn swp(corpus: f64, years: u32, rate_pct: f64) -> Result<f64, CalcError> {
    let (i, n) = monthly_terms(rate_pct, years)?;
    let denominator = 1.0 - growth_factor(i, -n)?;
    if denominator.abs() <= f64::EPSILON {
        return Err(CalcError::DegenerateRate);
    }
    finite(corpus * i / denominator)
}

/// Level monthly payment amortizing `principal` over `years` at `rate_pct`
/// percent: `principal * i * (1+i)^n / ((1+i)^n - 1)`.
pub fn emi(principal: f64, rate_pct: f64, years: u32) -> Result<f64, CalcError> {
    let (i, n) = monthly_terms(rate_pct, years)?;
    let factor = growth_factor(i, n)?;
    let denominator = factor - 1.0;
    if denominator.abs() <= f64::EPSILON {
        return Err(CalcError::DegenerateRate);
    }
    finite(principal * i * factor / denominator)
}
