use clap::{Args, Subcommand};
use serde_json::Value;

use rentscope_core::metrics::{self, AnalysisInput};
use rentscope_core::store::AnalysisStore;

use crate::store;

/// Saved analysis history
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved analyses, newest first
    List,
    /// Show one saved analysis with recomputed metrics
    Show {
        /// Index from `history list`
        index: usize,
    },
    /// Delete all saved analyses
    Clear,
}

pub fn run_history(args: HistoryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let history = AnalysisStore::new(store::open_default()?);

    match args.command {
        HistoryCommand::List => {
            let rows: Vec<Value> = history
                .entries()
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    serde_json::json!({
                        "index": index,
                        "saved_at": entry.saved_at.to_rfc3339(),
                        "address": entry.analysis.address,
                        "list_price": entry.analysis.property.list_price,
                    })
                })
                .collect();
            Ok(Value::Array(rows))
        }
        HistoryCommand::Show { index } => {
            let entries = history.entries();
            let entry = entries
                .get(index)
                .ok_or_else(|| format!("no history entry at index {index}"))?;

            // Derived metrics are recomputed, never stored.
            let analysis = AnalysisInput {
                address: entry.analysis.address.clone(),
                property: entry.analysis.property.clone(),
                params: entry.analysis.params.clone(),
            };
            let output = metrics::analyze(&analysis);

            Ok(serde_json::json!({
                "saved_at": entry.saved_at.to_rfc3339(),
                "analysis": entry.analysis,
                "metrics": serde_json::to_value(output)?,
            }))
        }
        HistoryCommand::Clear => {
            history.clear()?;
            Ok(serde_json::json!({ "status": "history cleared" }))
        }
    }
}
