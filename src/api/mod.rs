use axum::{
    Router,
    extract::{Json, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CalcError, DEFAULT_INFLATION_PCT, GoalPolicy, PricePoint, TaxTable, emi, income_tax, plan,
    risk_score, saving_suggestions, sip, swp,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    target: Option<f64>,
    years: Option<u32>,
    rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SwpPayload {
    corpus: Option<f64>,
    years: Option<u32>,
    rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EmiPayload {
    principal: Option<f64>,
    rate: Option<f64>,
    years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaxPayload {
    income: Option<f64>,
    deductions: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalPayload {
    current_cost: Option<f64>,
    years: Option<u32>,
    inflation: Option<f64>,
    accumulation_rate: Option<f64>,
    withdrawal_years: Option<u32>,
    withdrawal_rate: Option<f64>,
}

/// Price data arrives from external collaborators; any of it may be missing
/// or non-finite, and the score must still come back.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MarketPayload {
    series: Vec<PricePoint>,
    gold_price: Option<f64>,
    crypto_price: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SipResponse {
    monthly_contribution: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwpResponse {
    monthly_withdrawal: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmiResponse {
    monthly_payment: f64,
    total_interest: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxResponse {
    tax_due: f64,
    suggestions: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RiskResponse {
    score: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarketResponse {
    risk_score: i32,
    gold_price: Option<f64>,
    crypto_price: Option<f64>,
}

fn require_f64(value: Option<f64>, name: &str) -> Result<f64, String> {
    let Some(value) = value else {
        return Err(format!("{name} is required"));
    };
    if !value.is_finite() {
        return Err(format!("{name} must be finite"));
    }
    Ok(value)
}

fn require_positive(value: Option<f64>, name: &str) -> Result<f64, String> {
    let value = require_f64(value, name)?;
    if value <= 0.0 {
        return Err(format!("{name} must be > 0"));
    }
    Ok(value)
}

fn require_non_negative(value: Option<f64>, name: &str) -> Result<f64, String> {
    let value = require_f64(value, name)?;
    if value < 0.0 {
        return Err(format!("{name} must be >= 0"));
    }
    Ok(value)
}

fn require_years(value: Option<u32>, name: &str) -> Result<u32, String> {
    let Some(value) = value else {
        return Err(format!("{name} is required"));
    };
    if value == 0 {
        return Err(format!("{name} must be >= 1"));
    }
    Ok(value)
}

fn require_rate(value: Option<f64>, name: &str) -> Result<f64, String> {
    let value = require_f64(value, name)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("{name} must be between 0 and 100"));
    }
    Ok(value)
}

fn goal_policy_from_payload(payload: &GoalPayload) -> Result<GoalPolicy, String> {
    let defaults = GoalPolicy::default();
    let accumulation_rate = match payload.accumulation_rate {
        Some(_) => require_rate(payload.accumulation_rate, "accumulationRate")?,
        None => defaults.accumulation_rate,
    };
    let withdrawal_rate = match payload.withdrawal_rate {
        Some(_) => require_rate(payload.withdrawal_rate, "withdrawalRate")?,
        None => defaults.withdrawal_rate,
    };
    let withdrawal_years = match payload.withdrawal_years {
        Some(_) => require_years(payload.withdrawal_years, "withdrawalYears")?,
        None => defaults.withdrawal_years,
    };
    Ok(GoalPolicy {
        accumulation_rate,
        withdrawal_years,
        withdrawal_rate,
    })
}

fn json_response<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn calc_error_response(err: CalcError) -> Response {
    log::warn!("calculation rejected: {err}");
    error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string())
}

async fn sip_get_handler(Query(payload): Query<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn sip_post_handler(Json(payload): Json<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

fn sip_handler_impl(payload: SipPayload) -> Response {
    let parsed = require_positive(payload.target, "target")
        .and_then(|target| Ok((target, require_years(payload.years, "years")?)))
        .and_then(|(target, years)| Ok((target, years, require_rate(payload.rate, "rate")?)));
    let (target, years, rate) = match parsed {
        Ok(parsed) => parsed,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match sip(target, years, rate) {
        Ok(monthly_contribution) => json_response(SipResponse {
            monthly_contribution,
        }),
        Err(err) => calc_error_response(err),
    }
}

async fn swp_get_handler(Query(payload): Query<SwpPayload>) -> Response {
    swp_handler_impl(payload)
}

async fn swp_post_handler(Json(payload): Json<SwpPayload>) -> Response {
    swp_handler_impl(payload)
}

fn swp_handler_impl(payload: SwpPayload) -> Response {
    let parsed = require_positive(payload.corpus, "corpus")
        .and_then(|corpus| Ok((corpus, require_years(payload.years, "years")?)))
        .and_then(|(corpus, years)| Ok((corpus, years, require_rate(payload.rate, "rate")?)));
    let (corpus, years, rate) = match parsed {
        Ok(parsed) => parsed,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match swp(corpus, years, rate) {
        Ok(monthly_withdrawal) => json_response(SwpResponse { monthly_withdrawal }),
        Err(err) => calc_error_response(err),
    }
}

async fn emi_get_handler(Query(payload): Query<EmiPayload>) -> Response {
    emi_handler_impl(payload)
}

async fn emi_post_handler(Json(payload): Json<EmiPayload>) -> Response {
    emi_handler_impl(payload)
}

fn emi_handler_impl(payload: EmiPayload) -> Response {
    let parsed = require_positive(payload.principal, "principal")
        .and_then(|principal| Ok((principal, require_rate(payload.rate, "rate")?)))
        .and_then(|(principal, rate)| Ok((principal, rate, require_years(payload.years, "years")?)));
    let (principal, rate, years) = match parsed {
        Ok(parsed) => parsed,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match emi(principal, rate, years) {
        Ok(monthly_payment) => {
            let total_interest = monthly_payment * f64::from(years) * 12.0 - principal;
            json_response(EmiResponse {
                monthly_payment,
                total_interest,
            })
        }
        Err(err) => calc_error_response(err),
    }
}

async fn tax_get_handler(Query(payload): Query<TaxPayload>) -> Response {
    tax_handler_impl(payload)
}

async fn tax_post_handler(Json(payload): Json<TaxPayload>) -> Response {
    tax_handler_impl(payload)
}

fn tax_handler_impl(payload: TaxPayload) -> Response {
    let income = match require_non_negative(payload.income, "income") {
        Ok(income) => income,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let deductions = match require_non_negative(payload.deductions.or(Some(0.0)), "deductions") {
        Ok(deductions) => deductions,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let tax_due = income_tax(&TaxTable::default(), income, deductions);
    json_response(TaxResponse {
        tax_due,
        suggestions: saving_suggestions(income),
    })
}

async fn goal_get_handler(Query(payload): Query<GoalPayload>) -> Response {
    goal_handler_impl(payload)
}

async fn goal_post_handler(Json(payload): Json<GoalPayload>) -> Response {
    goal_handler_impl(payload)
}

fn goal_handler_impl(payload: GoalPayload) -> Response {
    let parsed = require_positive(payload.current_cost, "currentCost")
        .and_then(|cost| Ok((cost, require_years(payload.years, "years")?)))
        .and_then(|(cost, years)| {
            let inflation =
                require_f64(payload.inflation.or(Some(DEFAULT_INFLATION_PCT)), "inflation")?;
            Ok((cost, years, inflation))
        });
    let (current_cost, years, inflation) = match parsed {
        Ok(parsed) => parsed,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let policy = match goal_policy_from_payload(&payload) {
        Ok(policy) => policy,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match plan(current_cost, years, inflation, &policy) {
        Ok(goal_plan) => json_response(goal_plan),
        Err(err) => calc_error_response(err),
    }
}

async fn risk_handler(Json(payload): Json<MarketPayload>) -> Response {
    json_response(RiskResponse {
        score: risk_score(&payload.series),
    })
}

async fn market_handler(Json(payload): Json<MarketPayload>) -> Response {
    // Unavailable collaborator prices come back as null; they never fail
    // the score.
    json_response(MarketResponse {
        risk_score: risk_score(&payload.series),
        gold_price: payload.gold_price.filter(|price| price.is_finite()),
        crypto_price: payload.crypto_price.filter(|price| price.is_finite()),
    })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn router() -> Router {
    Router::new()
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .route("/api/swp", get(swp_get_handler).post(swp_post_handler))
        .route("/api/emi", get(emi_get_handler).post(emi_post_handler))
        .route("/api/tax", get(tax_get_handler).post(tax_post_handler))
        .route("/api/goal", get(goal_get_handler).post(goal_post_handler))
        .route("/api/risk", post(risk_handler))
        .route("/api/market", post(market_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("finplan API listening on http://{addr}");

    axum::serve(listener, router()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_field_is_rejected() {
        let err = require_positive(None, "target").expect_err("must fail");
        assert_eq!(err, "target is required");
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let err = require_positive(Some(f64::NAN), "target").expect_err("must fail");
        assert_eq!(err, "target must be finite");
    }

    #[test]
    fn out_of_range_rate_is_rejected() {
        assert!(require_rate(Some(120.0), "rate").is_err());
        assert!(require_rate(Some(-1.0), "rate").is_err());
        assert_eq!(require_rate(Some(12.0), "rate"), Ok(12.0));
    }

    #[test]
    fn zero_years_is_rejected_at_the_boundary() {
        let err = require_years(Some(0), "years").expect_err("must fail");
        assert_eq!(err, "years must be >= 1");
    }

    #[test]
    fn goal_policy_defaults_when_no_overrides() {
        let payload = GoalPayload::default();
        let policy = goal_policy_from_payload(&payload).expect("defaults are valid");
        assert_eq!(policy, GoalPolicy::default());
    }

    #[test]
    fn goal_policy_applies_overrides() {
        let payload = GoalPayload {
            accumulation_rate: Some(10.0),
            withdrawal_years: Some(20),
            withdrawal_rate: Some(6.0),
            ..GoalPayload::default()
        };
        let policy = goal_policy_from_payload(&payload).expect("overrides are valid");
        assert_eq!(policy.accumulation_rate, 10.0);
        assert_eq!(policy.withdrawal_years, 20);
        assert_eq!(policy.withdrawal_rate, 6.0);
    }

    #[test]
    fn goal_policy_rejects_bad_overrides() {
        let payload = GoalPayload {
            withdrawal_years: Some(0),
            ..GoalPayload::default()
        };
        assert!(goal_policy_from_payload(&payload).is_err());
    }
}
