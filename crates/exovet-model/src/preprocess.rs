//! Frozen-statistics preprocessing: median imputation, then standardization.
//!
//! Both stages apply statistics computed once at training time; inference
//! never recomputes them. The order is fixed — imputation must run first so
//! standardization sees no missing values.

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Per-column training medians. These are the artifact's payload: the file
/// format of `imputer.json` embeds this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputerStats {
    pub medians: Vec<f64>,
}

impl ImputerStats {
    /// Replace every NaN sentinel with the column's training median.
    pub fn transform(&self, features: &mut [f64]) -> Result<(), ModelError> {
        if features.len() != self.medians.len() {
            return Err(ModelError::ArtifactMismatch(format!(
                "imputer fitted on {} columns, input has {}",
                self.medians.len(),
                features.len()
            )));
        }
        for (value, median) in features.iter_mut().zip(&self.medians) {
            if value.is_nan() {
                *value = *median;
            }
        }
        Ok(())
    }
}

/// Per-column training means and standard deviations; the payload of
/// `scaler.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerStats {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

impl ScalerStats {
    /// Center and rescale each column to the training distribution.
    ///
    /// A zero training standard deviation (constant column) divides by 1.0,
    /// so constant columns standardize to 0 instead of NaN.
    pub fn transform(&self, features: &mut [f64]) -> Result<(), ModelError> {
        if features.len() != self.means.len() {
            return Err(ModelError::ArtifactMismatch(format!(
                "scaler fitted on {} columns, input has {}",
                self.means.len(),
                features.len()
            )));
        }
        for (i, value) in features.iter_mut().enumerate() {
            let std = self.stds[i];
            let scale = if std == 0.0 { 1.0 } else { std };
            *value = (*value - self.means[i]) / scale;
        }
        Ok(())
    }
}

/// The two-stage transform chain, strictly ordered: impute, then scale.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    imputer: ImputerStats,
    scaler: ScalerStats,
}

impl Preprocessor {
    /// Pair an imputer and scaler; they must agree on the column count.
    pub fn new(imputer: ImputerStats, scaler: ScalerStats) -> Result<Self, ModelError> {
        if imputer.medians.len() != scaler.means.len()
            || scaler.means.len() != scaler.stds.len()
        {
            return Err(ModelError::ArtifactMismatch(format!(
                "imputer has {} medians, scaler has {} means and {} stds",
                imputer.medians.len(),
                scaler.means.len(),
                scaler.stds.len()
            )));
        }
        Ok(Self { imputer, scaler })
    }

    pub fn column_count(&self) -> usize {
        self.imputer.medians.len()
    }

    /// Transform one feature vector. The output is fully numeric: no NaN
    /// survives imputation.
    pub fn transform(&self, mut features: Vec<f64>) -> Result<Vec<f64>, ModelError> {
        self.imputer.transform(&mut features)?;
        self.scaler.transform(&mut features)?;
        Ok(features)
    }

    /// Transform a batch of feature vectors independently.
    pub fn transform_batch(&self, rows: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>, ModelError> {
        rows.into_iter().map(|row| self.transform(row)).collect()
    }
}
