//! Inference Engine - ONNX Runtime Integration
//!
//! The `Classifier` trait is the seam between the HTTP layer and the
//! loaded network, so handlers can be exercised with a fake model.

use std::path::Path;

use ndarray::Array4;
use parking_lot::Mutex;
use serde::Serialize;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;

use crate::error::PredictError;
use super::labels::Labels;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A loaded image classifier: one batched input tensor in, one score per
/// class out.
pub trait Classifier: Send + Sync {
    fn classify(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError>;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX session; `Session::run` needs `&mut`, so calls are serialised.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: &Path, intra_threads: Option<usize>) -> Result<Self, PredictError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        let mut builder = Session::builder()
            .map_err(|e| PredictError::Inference(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| PredictError::Inference(format!("Failed to set optimization: {}", e)))?;

        if let Some(threads) = intra_threads {
            builder = builder
                .with_intra_threads(threads)
                .map_err(|e| PredictError::Inference(format!("Failed to set intra threads: {}", e)))?;
        }

        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| PredictError::Inference(format!("Failed to load model: {}", e)))?;

        let output_name = session.outputs().first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| PredictError::Shape("Model defines no outputs".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let input_tensor = Value::from_array(input)
            .map_err(|e| PredictError::Shape(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let output = outputs.get(&self.output_name)
            .ok_or_else(|| PredictError::Inference("No output".to_string()))?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| PredictError::Shape(format!("Extract error: {}", e)))?;

        Ok(data.to_vec())
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted_class: String,
    pub confidence: f32,
}

/// Index of the largest score; the first one wins on ties and the first
/// NaN wins outright, as numpy's `argmax` does.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if top.is_nan() => {}
            Some((_, top)) if !score.is_nan() && score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Map a score vector to its top label and raw score.
pub fn top_prediction(scores: &[f32], labels: &Labels) -> Result<Prediction, PredictError> {
    let idx = argmax(scores)
        .ok_or_else(|| PredictError::Shape("Model returned an empty prediction".to_string()))?;

    let label = labels.get(idx).ok_or_else(|| {
        PredictError::Shape(format!(
            "Predicted index {} has no label ({} labels loaded)",
            idx,
            labels.len()
        ))
    })?;

    let confidence = scores[idx];
    if !confidence.is_finite() {
        return Err(PredictError::Shape(format!(
            "Model returned a non-finite score ({}) at index {}",
            confidence, idx
        )));
    }

    Ok(Prediction {
        predicted_class: label.to_string(),
        confidence,
    })
}
