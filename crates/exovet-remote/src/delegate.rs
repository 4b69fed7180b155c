//! Orchestration of the delegated path: validate, dispatch, degrade or
//! propagate.

use exovet_core::{CandidateRecord, ClassificationResult, ValidationError};
use thiserror::Error;
use tracing::warn;

use crate::{FallbackClassifier, RemoteClassifier, RemoteConfig, RemoteError};

/// Terminal failure of a delegated classification.
#[derive(Debug, Error)]
pub enum DelegateError {
    /// The caller's record was malformed; nothing was dispatched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The authoritative call failed and fallback was not enabled.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// The delegated "classify one candidate" operation.
///
/// Validates the record, attempts the authoritative path once, and on any
/// classified remote failure either serves the local heuristic (when the
/// deployment opted in) or propagates the failure kind to the caller.
pub struct DelegatedClassifier {
    proxy: RemoteClassifier,
    fallback: Option<FallbackClassifier>,
}

impl DelegatedClassifier {
    pub fn new(config: RemoteConfig) -> Self {
        let fallback = config.fallback_enabled.then(FallbackClassifier::new);
        Self {
            proxy: RemoteClassifier::new(config),
            fallback,
        }
    }

    /// Override the fallback classifier (tests pin its confidence source).
    pub fn with_fallback(mut self, fallback: Option<FallbackClassifier>) -> Self {
        self.fallback = fallback;
        self
    }

    pub async fn classify(
        &self,
        record: &CandidateRecord,
    ) -> Result<ClassificationResult, DelegateError> {
        record.validate_complete()?;

        match self.proxy.classify(record).await {
            Ok(result) => Ok(result),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        kind = err.kind(),
                        error = %err,
                        candidate = %record.candidate_identifier,
                        "authoritative classifier failed; serving degraded fallback answer"
                    );
                    Ok(fallback.classify(record))
                }
                None => Err(err.into()),
            },
        }
    }
}
