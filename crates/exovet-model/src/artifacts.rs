//! Fitted-artifact bundle: frozen preprocessing statistics, the ordered
//! feature list, and the classifier model, all from one training run.
//!
//! The four files are versioned together. Mixing files from different runs
//! produces wrong probabilities with no numeric symptom, so the loader
//! refuses bundles whose training-run stamps or column counts disagree.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tracing::info;

use crate::preprocess::{ImputerStats, Preprocessor, ScalerStats};
use crate::ModelError;

pub const IMPUTER_FILE: &str = "imputer.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURES_FILE: &str = "feature_columns.json";
pub const CLASSIFIER_FILE: &str = "classifier.onnx";

#[derive(Debug, Deserialize)]
struct ImputerFile {
    training_run: String,
    #[serde(flatten)]
    stats: ImputerStats,
}

#[derive(Debug, Deserialize)]
struct ScalerFile {
    training_run: String,
    #[serde(flatten)]
    stats: ScalerStats,
}

#[derive(Debug, Deserialize)]
struct FeatureFile {
    training_run: String,
    columns: Vec<String>,
}

/// All fitted artifacts from one training run, loaded once and read-only
/// for the rest of the process lifetime.
#[derive(Debug)]
pub struct ArtifactBundle {
    training_run: String,
    feature_columns: Vec<String>,
    preprocessor: Preprocessor,
    classifier_path: PathBuf,
}

impl ArtifactBundle {
    /// Load and cross-check the bundle from a directory.
    ///
    /// Any missing file is an [`ModelError::ArtifactLoad`]; stamp or column
    /// disagreements are [`ModelError::ArtifactMismatch`]. Both are fatal
    /// configuration errors, never retried.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let imputer: ImputerFile = read_json(&dir.join(IMPUTER_FILE))?;
        let scaler: ScalerFile = read_json(&dir.join(SCALER_FILE))?;
        let features: FeatureFile = read_json(&dir.join(FEATURES_FILE))?;

        let classifier_path = dir.join(CLASSIFIER_FILE);
        if !classifier_path.exists() {
            return Err(ModelError::load(classifier_path, "file not found"));
        }

        if imputer.training_run != scaler.training_run
            || scaler.training_run != features.training_run
        {
            return Err(ModelError::ArtifactMismatch(format!(
                "artifacts come from different training runs: imputer={}, scaler={}, features={}",
                imputer.training_run, scaler.training_run, features.training_run
            )));
        }

        let preprocessor = Preprocessor::new(imputer.stats, scaler.stats)?;
        if preprocessor.column_count() != features.columns.len() {
            return Err(ModelError::ArtifactMismatch(format!(
                "transforms fitted on {} columns but the feature list has {}",
                preprocessor.column_count(),
                features.columns.len()
            )));
        }

        info!(
            training_run = %features.training_run,
            columns = features.columns.len(),
            dir = %dir.display(),
            "loaded artifact bundle"
        );

        Ok(Self {
            training_run: features.training_run,
            feature_columns: features.columns,
            preprocessor,
            classifier_path,
        })
    }

    /// Training-run stamp shared by every artifact in the bundle.
    pub fn training_run(&self) -> &str {
        &self.training_run
    }

    /// The ordered feature-name list the transforms were fitted against.
    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Location of the fitted classifier model.
    pub fn classifier_path(&self) -> &Path {
        &self.classifier_path
    }

    pub fn column_count(&self) -> usize {
        self.feature_columns.len()
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ModelError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ModelError::load(path, e))?;
    serde_json::from_str(&raw).map_err(|e| ModelError::load(path, e))
}

/// Lazily-loaded, shared artifact handle.
///
/// Concurrent first-callers synchronize on a single load: the slot is
/// guarded by a mutex, so exactly one caller reads the files and everyone
/// else waits for the cached `Arc`. A failed load leaves the slot empty and
/// surfaces the error to the caller.
#[derive(Debug)]
pub struct LazyArtifacts {
    dir: PathBuf,
    slot: Mutex<Option<Arc<ArtifactBundle>>>,
}

impl LazyArtifacts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            slot: Mutex::new(None),
        }
    }

    /// The bundle, loading it on first use.
    pub fn get(&self) -> Result<Arc<ArtifactBundle>, ModelError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bundle) = &*slot {
            return Ok(bundle.clone());
        }
        let bundle = Arc::new(ArtifactBundle::load(&self.dir)?);
        *slot = Some(bundle.clone());
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_bundle(dir: &Path, run: &str) {
        write_bundle_files(dir, run, run, run, 3);
    }

    fn write_bundle_files(
        dir: &Path,
        imputer_run: &str,
        scaler_run: &str,
        features_run: &str,
        columns: usize,
    ) {
        let medians: Vec<f64> = (0..columns).map(|i| i as f64).collect();
        let names: Vec<String> = (0..columns).map(|i| format!("f{i}")).collect();
        fs::write(
            dir.join(IMPUTER_FILE),
            serde_json::json!({"training_run": imputer_run, "medians": medians}).to_string(),
        )
        .unwrap();
        fs::write(
            dir.join(SCALER_FILE),
            serde_json::json!({
                "training_run": scaler_run,
                "means": vec![0.0; columns],
                "stds": vec![1.0; columns],
            })
            .to_string(),
        )
        .unwrap();
        fs::write(
            dir.join(FEATURES_FILE),
            serde_json::json!({"training_run": features_run, "columns": names}).to_string(),
        )
        .unwrap();
        fs::write(dir.join(CLASSIFIER_FILE), b"onnx-bytes").unwrap();
    }

    #[test]
    fn loads_consistent_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "2025-10-03-a");
        let bundle = ArtifactBundle::load(dir.path()).unwrap();
        assert_eq!(bundle.training_run(), "2025-10-03-a");
        assert_eq!(bundle.column_count(), 3);
        assert_eq!(bundle.feature_columns()[0], "f0");
        assert!(bundle.classifier_path().ends_with(CLASSIFIER_FILE));
    }

    #[test]
    fn missing_file_is_artifact_load_error() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "run");
        fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactLoad { .. }), "{err}");
    }

    #[test]
    fn missing_classifier_is_artifact_load_error() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "run");
        fs::remove_file(dir.path().join(CLASSIFIER_FILE)).unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactLoad { .. }));
    }

    #[test]
    fn garbled_json_is_artifact_load_error() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "run");
        fs::write(dir.path().join(IMPUTER_FILE), "{not json").unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactLoad { .. }));
    }

    #[test]
    fn mixed_training_runs_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle_files(dir.path(), "run-a", "run-b", "run-a", 3);
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactMismatch(_)), "{err}");
    }

    #[test]
    fn column_count_disagreement_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "run");
        // Rewrite the feature list with one extra column.
        fs::write(
            dir.path().join(FEATURES_FILE),
            serde_json::json!({"training_run": "run", "columns": ["f0", "f1", "f2", "f3"]})
                .to_string(),
        )
        .unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactMismatch(_)));
    }

    #[test]
    fn lazy_handle_caches_one_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "run");
        let lazy = LazyArtifacts::new(dir.path());
        let first = lazy.get().unwrap();
        let second = lazy.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn lazy_handle_shared_across_threads() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path(), "run");
        let lazy = Arc::new(LazyArtifacts::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = lazy.clone();
                std::thread::spawn(move || lazy.get().unwrap())
            })
            .collect();
        let bundles: Vec<Arc<ArtifactBundle>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        for bundle in &bundles[1..] {
            assert!(Arc::ptr_eq(&bundles[0], bundle));
        }
    }

    #[test]
    fn lazy_handle_surfaces_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let lazy = LazyArtifacts::new(dir.path());
        assert!(lazy.get().is_err());
    }
}
