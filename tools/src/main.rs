//! roi-server: HTTP server for invoice-automation ROI projections.
//!
//! Usage:
//!   roi-server --bind 127.0.0.1:8000 --db roi.db
//!   roi-server --assumptions data/assumptions.json --leads-log leads.jsonl
//!   roi-server --simulate input.json
//!
//! Every flag falls back to an environment variable (ROI_BIND, ROI_DB,
//! ROI_ASSUMPTIONS, ROI_LEADS_LOG), then to its default.

use anyhow::{Context, Result};
use invoice_roi_core::{
    calculator::RoiCalculator,
    config::RoiAssumptions,
    lead::JsonlLeadSink,
    report::{format_currency, format_one_decimal, format_percent},
    scenario::SimulationInput,
    service::RoiService,
    store::ScenarioStore,
};
use roi_server::AppState;
use std::env;

struct ServerConfig {
    bind:        String,
    db:          String,
    assumptions: Option<String>,
    leads_log:   Option<String>,
    simulate:    Option<String>,
}

impl ServerConfig {
    fn from_args(args: &[String]) -> Self {
        Self {
            bind:        flag_or_env(args, "--bind", "ROI_BIND").unwrap_or_else(|| "127.0.0.1:8000".into()),
            db:          flag_or_env(args, "--db", "ROI_DB").unwrap_or_else(|| "roi.db".into()),
            assumptions: flag_or_env(args, "--assumptions", "ROI_ASSUMPTIONS"),
            leads_log:   flag_or_env(args, "--leads-log", "ROI_LEADS_LOG"),
            simulate:    parse_arg(args, "--simulate"),
        }
    }

    fn load_assumptions(&self) -> Result<RoiAssumptions> {
        match &self.assumptions {
            Some(path) => RoiAssumptions::load(path),
            None => Ok(RoiAssumptions::default()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = ServerConfig::from_args(&args);
    let assumptions = config.load_assumptions()?;

    if let Some(path) = &config.simulate {
        return print_projection(path, assumptions);
    }

    let store = if config.db == ":memory:" {
        ScenarioStore::in_memory()?
    } else {
        ScenarioStore::open(&config.db).with_context(|| format!("opening database {}", config.db))?
    };
    let mut service = RoiService::build(assumptions, store)?;
    if let Some(path) = &config.leads_log {
        let sink = JsonlLeadSink::open(path)?;
        log::info!("lead log: {}", sink.path().display());
        service.register_sink(Box::new(sink));
    }

    log::info!(
        "assumptions: cost/invoice={} auto error rate={} savings boost factor={}",
        assumptions.automated_cost_per_invoice,
        assumptions.error_rate_auto,
        assumptions.boost_factor
    );
    log::info!("database: {}", config.db);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    roi_server::serve(listener, AppState::new(service)).await
}

/// One-shot mode: compute a projection from a JSON input file and print it.
fn print_projection(path: &str, assumptions: RoiAssumptions) -> Result<()> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let input: SimulationInput =
        serde_json::from_str(&content).with_context(|| format!("parsing {path}"))?;
    input.validate()?;

    let calculator = RoiCalculator::new(assumptions);
    let projection = calculator.project(&input);
    let result = calculator.checked_compute(&input)?;

    println!("=== ROI PROJECTION ===");
    println!("  monthly savings:    {}", format_currency(result.monthly_savings));
    println!("  cumulative savings: {}", format_currency(result.cumulative_savings));
    println!("  net savings:        {}", format_currency(result.net_savings));
    println!("  payback:            {} months", format_one_decimal(result.payback_months));
    println!("  roi:                {}", format_percent(result.roi_percentage));
    println!("  outcome:            {:?}", projection.outcome);
    println!();
    println!("=== ASSUMPTIONS ===");
    println!("  automated cost per invoice: {}", format_currency(assumptions.automated_cost_per_invoice));
    println!("  automated error rate:       {}", assumptions.error_rate_auto);
    println!("  savings boost factor:       {}x", assumptions.boost_factor);
    Ok(())
}

fn parse_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}

fn flag_or_env(args: &[String], flag: &str, var: &str) -> Option<String> {
    parse_arg(args, flag).or_else(|| env::var(var).ok().filter(|v| !v.is_empty()))
}
