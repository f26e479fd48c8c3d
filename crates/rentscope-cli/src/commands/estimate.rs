use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rentscope_core::estimate::PropertyEstimator;
use rentscope_core::metrics::{self, AnalysisInput, FinancialParams};
use rentscope_core::store::AnalysisStore;

use crate::provider::{HttpEstimator, DEFAULT_BASE_URL};
use crate::store;

/// Arguments for address estimation
#[derive(Args)]
pub struct EstimateArgs {
    /// Street address to estimate
    #[arg(long)]
    pub address: String,

    /// Estimation service API key (falls back to the stored key, then RENTSCOPE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Estimation service base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Also compute investment metrics from the estimated facts
    #[arg(long)]
    pub analyze: bool,

    /// Down payment as % of purchase price (with --analyze)
    #[arg(long, default_value = "20")]
    pub down_payment: Decimal,

    /// Annual mortgage interest rate in percent (with --analyze)
    #[arg(long, default_value = "7")]
    pub interest_rate: Decimal,

    /// Loan term in years (with --analyze)
    #[arg(long, default_value = "30")]
    pub loan_term: u32,

    /// Closing costs as % of purchase price (with --analyze)
    #[arg(long, default_value = "2")]
    pub closing_costs: Decimal,
}

/// Arguments for storing the API key
#[derive(Args)]
pub struct SetKeyArgs {
    /// API key for the estimation service
    pub api_key: String,
}

pub fn run_estimate(args: EstimateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let api_key = resolve_api_key(args.api_key.clone(), stored_api_key)
        .ok_or("no API key: pass --api-key, run `reic set-key`, or set RENTSCOPE_API_KEY")?;

    let estimator = HttpEstimator::new(&args.base_url, &api_key);
    let property = estimator.estimate(&args.address)?;

    if !args.analyze {
        return Ok(serde_json::to_value(property)?);
    }

    let analysis = AnalysisInput {
        address: args.address.clone(),
        property,
        params: FinancialParams {
            down_payment_percent: args.down_payment,
            interest_rate: args.interest_rate,
            loan_term_years: args.loan_term,
            closing_costs_percent: args.closing_costs,
        },
    };

    metrics::validate(&analysis.property, &analysis.params)?;
    Ok(serde_json::to_value(metrics::analyze(&analysis))?)
}

pub fn run_set_key(args: SetKeyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let history = AnalysisStore::new(store::open_default()?);
    history.set_api_key(&args.api_key)?;
    Ok(serde_json::json!({ "status": "api key stored" }))
}

/// Key precedence: explicit flag, then the stored key, then the environment.
/// The stored lookup only runs when the flag is absent, so an unusable data
/// directory cannot block a caller who supplied the key directly.
fn resolve_api_key(flag: Option<String>, stored: impl FnOnce() -> Option<String>) -> Option<String> {
    flag.or_else(stored)
        .or_else(|| std::env::var("RENTSCOPE_API_KEY").ok())
}

fn stored_api_key() -> Option<String> {
    let backing = store::open_default().ok()?;
    AnalysisStore::new(backing).api_key()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_skips_stored_lookup() {
        let key = resolve_api_key(Some("sk-flag".into()), || {
            panic!("stored key must not be read when --api-key is given")
        });
        assert_eq!(key.as_deref(), Some("sk-flag"));
    }

    #[test]
    fn test_falls_back_to_stored_key() {
        let key = resolve_api_key(None, || Some("sk-stored".into()));
        assert_eq!(key.as_deref(), Some("sk-stored"));
    }
}
