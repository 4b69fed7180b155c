use std::path::PathBuf;

use thiserror::Error;

/// Failures of the self-hosted pipeline. All of these indicate a broken
/// deployment rather than a bad request; none are retried.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required artifact is missing or unreadable at the configured
    /// location. Fatal at startup or on the first request.
    #[error("cannot load artifact {path}: {reason}")]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Artifacts disagree with each other or with the input shape —
    /// typically files from different training runs deployed together.
    #[error("artifact mismatch: {0}")]
    ArtifactMismatch(String),

    /// The fitted model failed at prediction time.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl ModelError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
