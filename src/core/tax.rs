use super::types::TaxTable;

const ELSS_INCOME_FLOOR: f64 = 1_500_000.0;
const HEALTH_COVER_INCOME_FLOOR: f64 = 700_000.0;
const RETIREMENT_SCHEME_INCOME_FLOOR: f64 = 500_000.0;

/// Progressive slab walk. Taxable income is `max(income - deductions, 0)`;
/// each slab consumes up to its own width at its rate, lowest slab first,
/// until nothing remains. Negative taxable income is a clamp, not an error.
pub fn income_tax(table: &TaxTable, income: f64, deductions: f64) -> f64 {
    let taxable = (income - deductions).max(0.0);
    let mut tax = 0.0;
    let mut remaining = taxable;
    for slab in table.slabs() {
        if remaining <= 0.0 {
            break;
        }
        let amount = remaining.min(slab.width);
        tax += amount * slab.rate;
        remaining -= amount;
    }
    tax
}

/// Rule-based saving advice. Each threshold is an independent check, so
/// higher incomes collect every suggestion whose floor they cross.
pub fn saving_suggestions(income: f64) -> Vec<&'static str> {
    let mut suggestions = Vec::new();
    if income > ELSS_INCOME_FLOOR {
        suggestions.push("Use the full ELSS allocation under Section 80C");
    }
    if income > HEALTH_COVER_INCOME_FLOOR {
        suggestions.push("Add a health insurance premium under Section 80D");
    }
    if income > RETIREMENT_SCHEME_INCOME_FLOOR {
        suggestions.push("Contribute to a retirement scheme under Section 80CCD");
    }
    suggestions
}
