use clap::{Parser, Subcommand};
use serde_json::json;

use finplan::api;
use finplan::core::{
    DEFAULT_INFLATION_PCT, GoalPolicy, PricePoint, TaxTable, emi, income_tax, plan, risk_score,
    saving_suggestions, sip, swp,
};

#[derive(Parser, Debug)]
#[command(
    name = "finplan",
    about = "Personal-finance calculators: SIP/SWP/EMI sizing, slab tax, goal planning, market risk"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monthly contribution needed to reach a target corpus
    Sip {
        #[arg(long, help = "Target corpus to accumulate")]
        target: f64,
        #[arg(long, help = "Investment period in whole years")]
        years: u32,
        #[arg(long, default_value_t = 12.0, help = "Expected annual return in percent")]
        rate: f64,
    },
    /// Monthly withdrawal a corpus can sustain
    Swp {
        #[arg(long, help = "Corpus available at the start of withdrawals")]
        corpus: f64,
        #[arg(long, help = "Withdrawal period in whole years")]
        years: u32,
        #[arg(long, default_value_t = 8.0, help = "Expected annual growth in percent")]
        rate: f64,
    },
    /// Level monthly payment on an amortized loan
    Emi {
        #[arg(long, help = "Loan principal")]
        principal: f64,
        #[arg(long, help = "Annual interest rate in percent")]
        rate: f64,
        #[arg(long, help = "Loan tenure in whole years")]
        years: u32,
    },
    /// Progressive slab tax plus saving suggestions
    Tax {
        #[arg(long, help = "Gross annual income")]
        income: f64,
        #[arg(long, default_value_t = 0.0, help = "Deductions subtracted before the slab walk")]
        deductions: f64,
    },
    /// Inflation-adjusted goal plan: future value, monthly SIP, post-goal SWP
    Goal {
        #[arg(long, help = "Cost of the goal in today's money")]
        current_cost: f64,
        #[arg(long, help = "Years until the goal")]
        years: u32,
        #[arg(
            long,
            default_value_t = DEFAULT_INFLATION_PCT,
            help = "Expected annual inflation in percent"
        )]
        inflation: f64,
        #[arg(
            long,
            default_value_t = GoalPolicy::default().accumulation_rate,
            help = "Annual return assumed while accumulating, in percent"
        )]
        accumulation_rate: f64,
        #[arg(
            long,
            default_value_t = GoalPolicy::default().withdrawal_years,
            help = "Post-goal withdrawal horizon in years"
        )]
        withdrawal_years: u32,
        #[arg(
            long,
            default_value_t = GoalPolicy::default().withdrawal_rate,
            help = "Annual growth assumed during withdrawals, in percent"
        )]
        withdrawal_rate: f64,
    },
    /// Volatility-based risk score for a close-price series
    Risk {
        #[arg(
            long,
            value_delimiter = ',',
            help = "Comma-separated close prices in chronological order"
        )]
        closes: Vec<f64>,
    },
    /// Run the JSON API server
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(message) = run(cli.command).await {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Sip {
            target,
            years,
            rate,
        } => {
            ensure_positive(target, "target")?;
            ensure_rate(rate, "rate")?;
            let monthly = sip(target, years, rate).map_err(|e| e.to_string())?;
            print_json(&json!({ "monthlyContribution": monthly }));
        }
        Command::Swp {
            corpus,
            years,
            rate,
        } => {
            ensure_positive(corpus, "corpus")?;
            ensure_rate(rate, "rate")?;
            let monthly = swp(corpus, years, rate).map_err(|e| e.to_string())?;
            print_json(&json!({ "monthlyWithdrawal": monthly }));
        }
        Command::Emi {
            principal,
            rate,
            years,
        } => {
            ensure_positive(principal, "principal")?;
            ensure_rate(rate, "rate")?;
            let monthly = emi(principal, rate, years).map_err(|e| e.to_string())?;
            let total_interest = monthly * f64::from(years) * 12.0 - principal;
            print_json(&json!({
                "monthlyPayment": monthly,
                "totalInterest": total_interest,
            }));
        }
        Command::Tax { income, deductions } => {
            ensure_non_negative(income, "income")?;
            ensure_non_negative(deductions, "deductions")?;
            let table = TaxTable::default();
            print_json(&json!({
                "taxDue": income_tax(&table, income, deductions),
                "suggestions": saving_suggestions(income),
            }));
        }
        Command::Goal {
            current_cost,
            years,
            inflation,
            accumulation_rate,
            withdrawal_years,
            withdrawal_rate,
        } => {
            ensure_positive(current_cost, "current-cost")?;
            ensure_rate(accumulation_rate, "accumulation-rate")?;
            ensure_rate(withdrawal_rate, "withdrawal-rate")?;
            if !inflation.is_finite() {
                return Err("--inflation must be finite".to_string());
            }
            let policy = GoalPolicy {
                accumulation_rate,
                withdrawal_years,
                withdrawal_rate,
            };
            let goal_plan =
                plan(current_cost, years, inflation, &policy).map_err(|e| e.to_string())?;
            print_json(&serde_json::to_value(goal_plan).map_err(|e| e.to_string())?);
        }
        Command::Risk { closes } => {
            let series: Vec<PricePoint> = closes
                .iter()
                .enumerate()
                .map(|(idx, &close)| PricePoint {
                    timestamp: idx as i64,
                    close,
                })
                .collect();
            print_json(&json!({ "score": risk_score(&series) }));
        }
        Command::Serve { port } => {
            api::run_http_server(port)
                .await
                .map_err(|e| format!("Server error: {e}"))?;
        }
    }
    Ok(())
}

fn ensure_positive(value: f64, name: &str) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("--{name} must be > 0"));
    }
    Ok(())
}

fn ensure_non_negative(value: f64, name: &str) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("--{name} must be >= 0"));
    }
    Ok(())
}

fn ensure_rate(value: f64, name: &str) -> Result<(), String> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(format!("--{name} must be between 0 and 100"));
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) {
    println!("{value:#}");
}
