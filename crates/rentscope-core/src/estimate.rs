//! Seam for the external address-to-facts estimation service.
//!
//! The service is an opaque, best-effort oracle: it takes a street address
//! and returns a JSON payload shaped roughly like [`PropertyFacts`]. Nothing
//! in the engine depends on an implementation, and tests never need one.

use serde_json::Value;

use crate::error::RentscopeError;
use crate::metrics::PropertyFacts;
use crate::RentscopeResult;

/// Capability interface over the estimation service. Implementations are
/// inherently non-deterministic; every failure mode (bad address, network,
/// malformed response, missing credential) collapses into
/// [`RentscopeError::EstimationFailed`].
pub trait PropertyEstimator {
    fn estimate(&self, address: &str) -> RentscopeResult<PropertyFacts>;
}

/// Decode a best-effort estimation payload into property facts.
///
/// Missing numeric fields read as zero, a missing `unit_rents` array as
/// empty, and a missing unit count as 1; unknown fields are ignored. Only a
/// payload that is not a JSON object, or one with wrongly-typed fields, is
/// rejected.
pub fn parse_estimate_payload(payload: Value) -> RentscopeResult<PropertyFacts> {
    if !payload.is_object() {
        return Err(RentscopeError::EstimationFailed(
            "estimation payload was not a JSON object".into(),
        ));
    }

    serde_json::from_value(payload).map_err(|e| RentscopeError::EstimationFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_full_payload() {
        let facts = parse_estimate_payload(json!({
            "list_price": "620000",
            "num_units": 2,
            "estimated_rent_per_unit": "2100",
            "unit_rents": ["2100", "2100"],
            "property_tax_annual": "9300",
            "insurance_annual": "1800",
            "hoa_monthly": "0",
            "maintenance_rate": "5",
            "vacancy_rate": "5"
        }))
        .unwrap();

        assert_eq!(facts.list_price, dec!(620000));
        assert_eq!(facts.num_units, 2);
        assert_eq!(facts.unit_rents, vec![dec!(2100), dec!(2100)]);
    }

    #[test]
    fn test_partial_payload_defaults() {
        let facts = parse_estimate_payload(json!({ "list_price": "450000" })).unwrap();
        assert_eq!(facts.list_price, dec!(450000));
        assert_eq!(facts.num_units, 1);
        assert_eq!(facts.estimated_rent_per_unit, Decimal::ZERO);
        assert!(facts.unit_rents.is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let facts = parse_estimate_payload(json!({
            "list_price": "100000",
            "comps": ["123 Oak St", "456 Elm Ave"],
            "confidence": 0.7
        }))
        .unwrap();
        assert_eq!(facts.list_price, dec!(100000));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(parse_estimate_payload(json!("not a record")).is_err());
        assert!(parse_estimate_payload(json!([1, 2, 3])).is_err());
        assert!(parse_estimate_payload(json!(null)).is_err());
    }

    #[test]
    fn test_wrongly_typed_field_rejected() {
        let err = parse_estimate_payload(json!({ "list_price": true })).unwrap_err();
        match err {
            RentscopeError::EstimationFailed(_) => {}
            other => panic!("expected EstimationFailed, got {other:?}"),
        }
    }
}
