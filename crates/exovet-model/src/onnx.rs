//! ONNX Runtime wrapper around the fitted classifier.
//!
//! The model takes a `[1, n]` float32 feature tensor and must expose its
//! class probabilities as a float tensor output (export with zipmap
//! disabled). The positive class is the last probability column.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use crate::{ModelError, ProbabilityModel};

/// Fitted binary classifier served through ONNX Runtime.
pub struct OnnxClassifier {
    // ort sessions take &mut self to run; serialize access behind a lock so
    // the classifier can be shared across request threads.
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Load the fitted model from `classifier.onnx`.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::load(path, "file not found"));
        }
        let session = Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| ModelError::load(path, e))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| ModelError::load(path, "model declares no inputs"))?;

        // Prefer the probability output; exporters name the label tensor
        // first and the probabilities second.
        let output_name = session
            .outputs()
            .iter()
            .map(|o| o.name().to_string())
            .find(|name| name.to_ascii_lowercase().contains("prob"))
            .or_else(|| session.outputs().last().map(|o| o.name().to_string()))
            .ok_or_else(|| ModelError::load(path, "model declares no outputs"))?;

        info!(
            model = %path.display(),
            input = %input_name,
            output = %output_name,
            "loaded classifier model"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl ProbabilityModel for OnnxClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ModelError> {
        let shape = [1i64, features.len() as i64];
        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let tensor = Tensor::from_array((shape, data.into_boxed_slice()))
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let (out_shape, out_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        // [1, 2] class probabilities, or [1] already reduced to P(positive).
        let proba = match out_data.len() {
            0 => {
                return Err(ModelError::Inference(format!(
                    "probability output '{}' is empty (shape {out_shape:?})",
                    self.output_name
                )));
            }
            1 => out_data[0],
            _ => out_data[out_data.len() - 1],
        };
        Ok(f64::from(proba).clamp(0.0, 1.0))
    }
}
