//! Self-hosted inference pipeline over frozen training artifacts.

mod artifacts;
mod error;
mod features;
#[cfg(feature = "onnx")]
mod onnx;
mod preprocess;
mod service;

pub use artifacts::{
    ArtifactBundle, LazyArtifacts, CLASSIFIER_FILE, FEATURES_FILE, IMPUTER_FILE, SCALER_FILE,
};
pub use error::ModelError;
pub use features::build_feature_vector;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use preprocess::{ImputerStats, Preprocessor, ScalerStats};
pub use service::{InferenceService, ProbabilityModel, DECISION_THRESHOLD};
