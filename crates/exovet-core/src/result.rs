//! The canonical classification response payload.
//!
//! Both serving paths (self-hosted and delegated) produce this exact shape,
//! so callers are agnostic to which path answered.

use serde::{Deserialize, Serialize};

/// Derived attributes accompanying a verdict.
///
/// The details block always carries all five keys; unknown values serialize
/// as null rather than being omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetails {
    pub planet_name: Option<String>,
    pub planet_type: Option<String>,
    pub radius_earth: Option<f64>,
    pub orbital_period_days: Option<f64>,
    pub equilibrium_temp_kelvin: Option<f64>,
}

/// Outcome of classifying one candidate. Immutable once produced.
///
/// `confidence` is the probability of the *predicted* class, not always the
/// positive-class probability, rounded to six decimals. On the delegated
/// path `is_exoplanet` and `confidence` are advisory: an authority response
/// that omits them is passed through with the fields absent rather than
/// fabricated. A degraded (fallback) answer carries a `note`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub candidate_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exoplanet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ResultDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Round a confidence value to the six decimals the response contract fixes.
pub fn round_confidence(p: f64) -> f64 {
    (p * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_six_decimals() {
        assert_eq!(round_confidence(0.123_456_789), 0.123_457);
        assert_eq!(round_confidence(0.999_999_4), 0.999_999);
        assert_eq!(round_confidence(0.0), 0.0);
        assert_eq!(round_confidence(1.0), 1.0);
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let result = ClassificationResult {
            candidate_identifier: "K00752.01".into(),
            is_exoplanet: Some(true),
            confidence: Some(0.987_654),
            details: Some(ResultDetails {
                planet_name: None,
                planet_type: Some("Mini-Neptune".into()),
                radius_earth: Some(2.26),
                orbital_period_days: Some(9.48),
                equilibrium_temp_kelvin: Some(793.0),
            }),
            note: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["candidateIdentifier"], "K00752.01");
        assert_eq!(json["isExoplanet"], true);
        assert_eq!(json["confidence"], 0.987_654);
        assert_eq!(json["details"]["planetType"], "Mini-Neptune");
        assert_eq!(json["details"]["radiusEarth"], 2.26);
        // planetName is always present in details, null when unknown.
        assert!(json["details"]["planetName"].is_null());
        // A non-degraded answer omits the note entirely.
        assert!(json.get("note").is_none());
    }

    #[test]
    fn advisory_missing_fields_are_omitted() {
        let result = ClassificationResult {
            candidate_identifier: "x".into(),
            is_exoplanet: None,
            confidence: None,
            details: None,
            note: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("isExoplanet").is_none());
        assert!(json.get("confidence").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn deserialize_tolerates_missing_fields() {
        let result: ClassificationResult =
            serde_json::from_str(r#"{"candidateIdentifier": "x"}"#).unwrap();
        assert!(result.is_exoplanet.is_none());
        assert!(result.confidence.is_none());
    }

    #[test]
    fn round_trips() {
        let result = ClassificationResult {
            candidate_identifier: "degraded".into(),
            is_exoplanet: Some(false),
            confidence: Some(0.62),
            details: Some(ResultDetails::default()),
            note: Some("served by fallback".into()),
        };
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ClassificationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
