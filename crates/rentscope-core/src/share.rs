//! Shareable analysis payloads.
//!
//! An analysis is shared as a URL-safe token: the input records serialised
//! to JSON and base64-encoded. Derived metrics are never part of the
//! payload; the receiver recomputes them from the inputs.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::RentscopeError;
use crate::metrics::{FinancialParams, PropertyFacts};
use crate::RentscopeResult;

/// Current schema version written into new records.
pub const SHARE_SCHEMA_VERSION: u32 = 1;

/// A saved or shared analysis: the two engine inputs plus the address they
/// describe. Every field defaults, so partial or legacy records still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedAnalysis {
    pub schema_version: u32,
    pub address: String,
    pub property: PropertyFacts,
    pub params: FinancialParams,
}

impl Default for SharedAnalysis {
    fn default() -> Self {
        Self {
            schema_version: SHARE_SCHEMA_VERSION,
            address: String::new(),
            property: PropertyFacts::default(),
            params: FinancialParams::default(),
        }
    }
}

/// Encode an analysis as a URL-safe share token.
pub fn encode_share(analysis: &SharedAnalysis) -> RentscopeResult<String> {
    let json = serde_json::to_vec(analysis)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a token produced by [`encode_share`]. Surrounding whitespace is
/// tolerated; anything else malformed is a [`RentscopeError::Share`].
pub fn decode_share(token: &str) -> RentscopeResult<SharedAnalysis> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| RentscopeError::Share(format!("invalid share token: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| RentscopeError::Share(format!("unreadable share payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample() -> SharedAnalysis {
        SharedAnalysis {
            address: "900 E 51st St, Austin TX".into(),
            property: PropertyFacts {
                list_price: dec!(620000),
                num_units: 2,
                unit_rents: vec![dec!(2100), dec!(2100)],
                ..PropertyFacts::default()
            },
            ..SharedAnalysis::default()
        }
    }

    #[test]
    fn test_round_trip() {
        let analysis = sample();
        let token = encode_share(&analysis).unwrap();
        assert_eq!(decode_share(&token).unwrap(), analysis);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode_share(&sample()).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let token = encode_share(&sample()).unwrap();
        assert_eq!(decode_share(&format!("  {token}\n")).unwrap(), sample());
    }

    #[test]
    fn test_legacy_record_defaults_missing_fields() {
        // A v0-era record that only carried the property block
        let legacy = URL_SAFE_NO_PAD.encode(r#"{"property":{"list_price":"150000"}}"#);
        let decoded = decode_share(&legacy).unwrap();
        assert_eq!(decoded.property.list_price, dec!(150000));
        assert_eq!(decoded.params, FinancialParams::default());
        assert_eq!(decoded.address, "");
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_share("not!!valid@@base64").is_err());
    }

    #[test]
    fn test_non_json_payload_rejected() {
        let token = URL_SAFE_NO_PAD.encode("definitely not json");
        match decode_share(&token).unwrap_err() {
            RentscopeError::Share(_) => {}
            other => panic!("expected Share error, got {other:?}"),
        }
    }
}
