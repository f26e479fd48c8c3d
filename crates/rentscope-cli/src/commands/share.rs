use clap::Args;
use serde_json::Value;

use rentscope_core::metrics::{self, AnalysisInput};
use rentscope_core::share::{self, SharedAnalysis};

use crate::input;

/// Arguments for encoding a share token
#[derive(Args)]
pub struct ShareArgs {
    /// Path to a JSON analysis file (address, property, params)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for decoding a share token
#[derive(Args)]
pub struct OpenArgs {
    /// Share token produced by `reic share`
    pub token: String,
}

pub fn run_share(args: ShareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis: AnalysisInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("provide --input or pipe an analysis as JSON".into());
    };

    metrics::validate(&analysis.property, &analysis.params)?;

    let token = share::encode_share(&SharedAnalysis {
        address: analysis.address,
        property: analysis.property,
        params: analysis.params,
        ..SharedAnalysis::default()
    })?;

    Ok(serde_json::json!({ "token": token }))
}

pub fn run_open(args: OpenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let shared = share::decode_share(&args.token)?;

    // Metrics are never carried in the token; recompute from the inputs.
    let analysis = AnalysisInput {
        address: shared.address.clone(),
        property: shared.property.clone(),
        params: shared.params.clone(),
    };
    let output = metrics::analyze(&analysis);

    Ok(serde_json::json!({
        "analysis": shared,
        "metrics": serde_json::to_value(output)?,
    }))
}
