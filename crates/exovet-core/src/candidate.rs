//! Candidate records and the fixed feature schema.
//!
//! The schema order is a constant in code, not inferred from input: the
//! fitted imputer and scaler were trained against exactly this column order,
//! so permuting it silently corrupts predictions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of numeric features in a candidate record.
pub const FEATURE_COUNT: usize = 15;

/// The fixed, ordered feature schema shared with the training pipeline.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "koi_period",
    "koi_time0bk",
    "koi_impact",
    "koi_duration",
    "koi_depth",
    "koi_prad",
    "koi_teq",
    "koi_insol",
    "koi_model_snr",
    "koi_steff",
    "koi_slogg",
    "koi_srad",
    "ra",
    "dec",
    "koi_kepmag",
];

/// A transit-survey detection submitted for classification.
///
/// The identifier is opaque and echoed back unchanged. Every feature is
/// optional on the self-hosted path (absence becomes the missing-value
/// sentinel); the delegated path requires all of them — see
/// [`validate_complete`](Self::validate_complete). Unknown JSON keys are
/// ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "candidateIdentifier", alias = "customIdentifier")]
    pub candidate_identifier: String,
    pub koi_period: Option<f64>,
    pub koi_time0bk: Option<f64>,
    pub koi_impact: Option<f64>,
    pub koi_duration: Option<f64>,
    pub koi_depth: Option<f64>,
    pub koi_prad: Option<f64>,
    pub koi_teq: Option<f64>,
    pub koi_insol: Option<f64>,
    pub koi_model_snr: Option<f64>,
    pub koi_steff: Option<f64>,
    pub koi_slogg: Option<f64>,
    pub koi_srad: Option<f64>,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
    pub koi_kepmag: Option<f64>,
}

/// Caller input rejected before any processing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("missing required features: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl CandidateRecord {
    /// All features in schema order, paired with their schema names.
    pub fn features(&self) -> [(&'static str, Option<f64>); FEATURE_COUNT] {
        [
            ("koi_period", self.koi_period),
            ("koi_time0bk", self.koi_time0bk),
            ("koi_impact", self.koi_impact),
            ("koi_duration", self.koi_duration),
            ("koi_depth", self.koi_depth),
            ("koi_prad", self.koi_prad),
            ("koi_teq", self.koi_teq),
            ("koi_insol", self.koi_insol),
            ("koi_model_snr", self.koi_model_snr),
            ("koi_steff", self.koi_steff),
            ("koi_slogg", self.koi_slogg),
            ("koi_srad", self.koi_srad),
            ("ra", self.ra),
            ("dec", self.dec),
            ("koi_kepmag", self.koi_kepmag),
        ]
    }

    /// Reject the record unless every feature is present.
    ///
    /// The delegated path calls this before dispatching to the authoritative
    /// classifier; the self-hosted path tolerates absent features instead.
    pub fn validate_complete(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = self
            .features()
            .into_iter()
            .filter_map(|(name, value)| value.is_none().then_some(name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}
