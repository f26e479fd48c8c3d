use napi::Result as NapiResult;
use napi_derive::napi;

use rentscope_core::metrics::{self, AnalysisInput};
use rentscope_core::rents;
use rentscope_core::share::{self, SharedAnalysis};
use rentscope_core::types::Money;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_investment(input_json: String) -> NapiResult<String> {
    let input: AnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = metrics::analyze(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn validate_inputs(input_json: String) -> NapiResult<()> {
    let input: AnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    metrics::validate(&input.property, &input.params).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rent roll editing
// ---------------------------------------------------------------------------

#[napi]
pub fn resize_unit_rents(rents_json: String, new_count: u32, fallback: String) -> NapiResult<String> {
    let current: Vec<Money> = serde_json::from_str(&rents_json).map_err(to_napi_error)?;
    let fallback: Money = fallback.parse().map_err(to_napi_error)?;
    let resized = rents::resize_unit_rents(&current, new_count as usize, fallback);
    serde_json::to_string(&resized).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

#[napi]
pub fn encode_share_link(analysis_json: String) -> NapiResult<String> {
    let analysis: SharedAnalysis = serde_json::from_str(&analysis_json).map_err(to_napi_error)?;
    share::encode_share(&analysis).map_err(to_napi_error)
}

#[napi]
pub fn decode_share_link(token: String) -> NapiResult<String> {
    let analysis = share::decode_share(&token).map_err(to_napi_error)?;
    serde_json::to_string(&analysis).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency_display(amount: String) -> NapiResult<String> {
    let amount: Money = amount.parse().map_err(to_napi_error)?;
    Ok(rentscope_core::format::format_currency(amount))
}

#[napi]
pub fn format_percent_display(value: String) -> NapiResult<String> {
    let value: rust_decimal::Decimal = value.parse().map_err(to_napi_error)?;
    Ok(rentscope_core::format::format_percent(value))
}
