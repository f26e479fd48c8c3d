use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rentscope_core::metrics::{self, AnalysisInput, FinancialParams, PropertyFacts};
use rentscope_core::share::SharedAnalysis;
use rentscope_core::store::AnalysisStore;

use crate::input;
use crate::store;

/// Arguments for investment analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub list_price: Option<Decimal>,

    /// Number of rental units
    #[arg(long, default_value = "1")]
    pub num_units: u32,

    /// Fallback monthly rent per unit
    #[arg(long)]
    pub rent_per_unit: Option<Decimal>,

    /// Monthly rent per unit in unit order, comma-separated (overrides --rent-per-unit)
    #[arg(long, value_delimiter = ',')]
    pub unit_rents: Option<Vec<Decimal>>,

    /// Annual property tax
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Annual insurance premium
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Monthly HOA dues
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    /// Maintenance allowance as % of effective gross income
    #[arg(long, default_value = "5")]
    pub maintenance_rate: Decimal,

    /// Vacancy allowance as % of potential gross income
    #[arg(long, default_value = "5")]
    pub vacancy_rate: Decimal,

    /// Down payment as % of purchase price
    #[arg(long, default_value = "20")]
    pub down_payment: Decimal,

    /// Annual mortgage interest rate in percent (e.g. 6.5)
    #[arg(long, default_value = "7")]
    pub interest_rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub loan_term: u32,

    /// Closing costs as % of purchase price
    #[arg(long, default_value = "2")]
    pub closing_costs: Decimal,

    /// Street address, recorded with saved or shared analyses
    #[arg(long, default_value = "")]
    pub address: String,

    /// Save this analysis to the local history
    #[arg(long)]
    pub save: bool,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis: AnalysisInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let list_price = args
            .list_price
            .ok_or("--list-price is required (or provide --input)")?;

        AnalysisInput {
            address: args.address.clone(),
            property: PropertyFacts {
                list_price,
                num_units: args.num_units,
                estimated_rent_per_unit: args.rent_per_unit.unwrap_or(Decimal::ZERO),
                unit_rents: args.unit_rents.clone().unwrap_or_default(),
                property_tax_annual: args.property_tax,
                insurance_annual: args.insurance,
                hoa_monthly: args.hoa,
                maintenance_rate: args.maintenance_rate,
                vacancy_rate: args.vacancy_rate,
            },
            params: FinancialParams {
                down_payment_percent: args.down_payment,
                interest_rate: args.interest_rate,
                loan_term_years: args.loan_term,
                closing_costs_percent: args.closing_costs,
            },
        }
    };

    metrics::validate(&analysis.property, &analysis.params)?;
    let output = metrics::analyze(&analysis);

    if args.save {
        let history = AnalysisStore::new(store::open_default()?);
        history.save(SharedAnalysis {
            address: analysis.address.clone(),
            property: analysis.property.clone(),
            params: analysis.params.clone(),
            ..SharedAnalysis::default()
        })?;
    }

    Ok(serde_json::to_value(output)?)
}
