//! Ordered feature-vector construction.

use std::collections::HashMap;

use exovet_core::CandidateRecord;

use crate::ModelError;

/// Build the model-input vector for a candidate, in the bundle's fitted
/// column order.
///
/// Each position holds the record's value for that column name when present,
/// else the NaN missing-value sentinel (never zero — downstream imputation
/// distinguishes the two). Columns are taken from the artifact bundle, so
/// the order is frozen with the transforms; a bundle column this schema
/// cannot supply is an [`ModelError::ArtifactMismatch`].
pub fn build_feature_vector(
    record: &CandidateRecord,
    columns: &[String],
) -> Result<Vec<f64>, ModelError> {
    let values: HashMap<&str, Option<f64>> = record.features().into_iter().collect();
    columns
        .iter()
        .map(|name| {
            values
                .get(name.as_str())
                .copied()
                .ok_or_else(|| {
                    ModelError::ArtifactMismatch(format!(
                        "bundle expects feature '{name}' which the candidate schema does not define"
                    ))
                })
                .map(|value| value.unwrap_or(f64::NAN))
        })
        .collect()
}
