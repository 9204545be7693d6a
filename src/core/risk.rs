use super::types::PricePoint;

/// Score handed out when the series cannot support a volatility estimate.
pub const NEUTRAL_SCORE: i32 = 5;

/// Assumed trading calendar used to annualize per-sample volatility.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

const MAX_SCORE: i32 = 10;

/// Best-effort volatility heuristic, not a rigorous risk model: percentage
/// changes between consecutive closes, population standard deviation,
/// annualized by sqrt(252), mapped onto `floor(10 - vol * 100)`.
///
/// Capped at 10 above; deliberately not floored at 0, so an extremely
/// volatile series can score negative. Empty or single-sample series, a zero
/// close, or any non-finite intermediate all fall back to [`NEUTRAL_SCORE`].
pub fn risk_score(series: &[PricePoint]) -> i32 {
    let Some(volatility) = annualized_volatility(series) else {
        return NEUTRAL_SCORE;
    };

    let raw = 10.0 - volatility * 100.0;
    if !raw.is_finite() {
        return NEUTRAL_SCORE;
    }
    (raw.floor() as i32).min(MAX_SCORE)
}

fn annualized_volatility(series: &[PricePoint]) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }

    let mut changes = Vec::with_capacity(series.len() - 1);
    for pair in series.windows(2) {
        let previous = pair[0].close;
        if previous == 0.0 {
            return None;
        }
        let change = (pair[1].close - previous) / previous;
        if !change.is_finite() {
            return None;
        }
        changes.push(change);
    }

    let count = changes.len() as f64;
    let mean = changes.iter().sum::<f64>() / count;
    let variance = changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / count;
    let volatility = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();
    volatility.is_finite().then_some(volatility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert, proptest};

    fn series_from(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(idx, &close)| PricePoint {
                timestamp: idx as i64,
                close,
            })
            .collect()
    }

    #[test]
    fn empty_series_scores_neutral() {
        assert_eq!(risk_score(&[]), NEUTRAL_SCORE);
    }

    #[test]
    fn single_sample_scores_neutral() {
        assert_eq!(risk_score(&series_from(&[18_250.0])), NEUTRAL_SCORE);
    }

    #[test]
    fn zero_close_scores_neutral() {
        // A zero close would blow up the percentage change.
        assert_eq!(
            risk_score(&series_from(&[100.0, 0.0, 100.0])),
            NEUTRAL_SCORE
        );
    }

    #[test]
    fn non_finite_close_scores_neutral() {
        assert_eq!(
            risk_score(&series_from(&[100.0, f64::NAN, 101.0])),
            NEUTRAL_SCORE
        );
    }

    #[test]
    fn constant_series_scores_the_maximum() {
        assert_eq!(risk_score(&series_from(&[250.0, 250.0, 250.0, 250.0])), 10);
    }

    #[test]
    fn equal_ratio_moves_have_zero_dispersion() {
        // Every change is exactly +100%, so the deviation around the mean
        // is 0 even though the series itself moves hard.
        assert_eq!(risk_score(&series_from(&[100.0, 200.0, 400.0, 800.0])), 10);
    }

    #[test]
    fn known_volatility_matches_hand_computation() {
        // Changes +10% and -10%: mean 0, population std dev 0.1,
        // annualized 0.1 * sqrt(252) ~= 1.5875, raw score ~= -148.7.
        let expected = (10.0 - 0.1 * 252.0_f64.sqrt() * 100.0).floor() as i32;
        assert_eq!(risk_score(&series_from(&[100.0, 110.0, 99.0])), expected);
    }

    #[test]
    fn extreme_volatility_scores_below_zero() {
        // The floor is intentionally unclamped; only the cap at 10 applies.
        let score = risk_score(&series_from(&[100.0, 200.0, 100.0, 200.0, 100.0]));
        assert!(score < 0, "expected a negative score, got {score}");
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_score_never_exceeds_the_cap(
            closes in vec(1.0..1_000_000.0f64, 0..50)
        ) {
            let score = risk_score(&series_from(&closes));
            prop_assert!(score <= 10, "score {score} above cap");
        }

        #[test]
        fn prop_degenerate_series_always_neutral(
            closes in vec(1.0..1_000_000.0f64, 0..2)
        ) {
            prop_assert!(risk_score(&series_from(&closes)) == NEUTRAL_SCORE);
        }
    }
}
