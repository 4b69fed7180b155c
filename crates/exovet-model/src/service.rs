//! The self-hosted "classify one candidate" operation.

use std::sync::Arc;

use exovet_core::{
    planet_type_label, round_confidence, CandidateRecord, ClassificationResult, ResultDetails,
};
use tracing::debug;

use crate::features::build_feature_vector;
use crate::{ArtifactBundle, ModelError};

/// Fixed decision threshold on the positive-class probability. There is no
/// calibration or tuning surface at serving time.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// A fitted binary probabilistic model: preprocessed features in,
/// positive-class probability out.
pub trait ProbabilityModel: Send + Sync {
    /// Probability in [0, 1] that the candidate is a real planet.
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError>;
}

/// Composes the pipeline: feature vector → impute/scale → classify →
/// derived attributes → canonical result.
///
/// Holds the artifacts behind shared read-only handles; safe to call from
/// concurrent requests without locking.
pub struct InferenceService {
    bundle: Arc<ArtifactBundle>,
    model: Arc<dyn ProbabilityModel>,
}

impl InferenceService {
    pub fn new(bundle: Arc<ArtifactBundle>, model: Arc<dyn ProbabilityModel>) -> Self {
        Self { bundle, model }
    }

    /// Load the bundle and its ONNX classifier from a directory.
    #[cfg(feature = "onnx")]
    pub fn open(dir: &std::path::Path) -> Result<Self, ModelError> {
        let bundle = Arc::new(ArtifactBundle::load(dir)?);
        let model = Arc::new(crate::OnnxClassifier::load(bundle.classifier_path())?);
        Ok(Self::new(bundle, model))
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Classify one candidate.
    ///
    /// Deterministic for a fixed bundle: identical input yields bit-identical
    /// output. Planet type is derived from the raw radius — the standardized
    /// value has lost the physical unit the buckets are defined in.
    pub fn classify(&self, record: &CandidateRecord) -> Result<ClassificationResult, ModelError> {
        let features = build_feature_vector(record, self.bundle.feature_columns())?;
        let scaled = self.bundle.preprocessor().transform(features)?;
        let proba = self.model.predict_proba(&scaled)?;
        if !(0.0..=1.0).contains(&proba) {
            return Err(ModelError::Inference(format!(
                "model produced probability {proba} outside [0, 1]"
            )));
        }

        let positive = proba >= DECISION_THRESHOLD;
        // Confidence is the probability of the predicted class, not of the
        // positive class.
        let confidence = round_confidence(if positive { proba } else { 1.0 - proba });

        debug!(
            candidate = %record.candidate_identifier,
            proba,
            positive,
            "classified candidate"
        );

        Ok(ClassificationResult {
            candidate_identifier: record.candidate_identifier.clone(),
            is_exoplanet: Some(positive),
            confidence: Some(confidence),
            details: Some(ResultDetails {
                planet_name: None,
                planet_type: planet_type_label(record.koi_prad).map(str::to_string),
                radius_earth: record.koi_prad,
                orbital_period_days: record.koi_period,
                equilibrium_temp_kelvin: record.koi_teq,
            }),
            note: None,
        })
    }
}
