//! HTTP client for the hosted estimation service.
//!
//! The service is a best-effort oracle: POST an address, get back a JSON
//! object shaped like `PropertyFacts`. Every failure mode surfaces as the
//! one generic estimation error; there is nothing actionable to distinguish.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use rentscope_core::error::RentscopeError;
use rentscope_core::estimate::{parse_estimate_payload, PropertyEstimator};
use rentscope_core::metrics::PropertyFacts;
use rentscope_core::RentscopeResult;

pub const DEFAULT_BASE_URL: &str = "https://api.rentscope.dev";

pub struct HttpEstimator {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
struct EstimateRequest<'a> {
    address: &'a str,
}

impl HttpEstimator {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl PropertyEstimator for HttpEstimator {
    fn estimate(&self, address: &str) -> RentscopeResult<PropertyFacts> {
        let url = format!("{}/v1/estimate", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EstimateRequest { address })
            .send()
            .map_err(|e| RentscopeError::EstimationFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RentscopeError::EstimationFailed(format!(
                "estimation service returned {}",
                response.status()
            )));
        }

        let payload = response
            .json()
            .map_err(|e| RentscopeError::EstimationFailed(e.to_string()))?;

        parse_estimate_payload(payload)
    }
}
