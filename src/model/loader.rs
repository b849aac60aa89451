//! Startup loader
//!
//! Runs once before the listener binds. Any error here aborts the
//! process; there is no fallback model.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use ndarray::Array4;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::preprocess::{CHANNELS, IMAGE_INPUT_SIZE};
use super::inference::{Classifier, OnnxClassifier};
use super::labels::Labels;
use super::LoadedModel;

/// Load model and labels from the configured paths.
pub fn load(config: &Config) -> anyhow::Result<LoadedModel> {
    ensure_exists(&config.model_path, "Model")?;
    ensure_exists(&config.labels_path, "Labels")?;

    let start = Instant::now();

    let sha256 = file_checksum(&config.model_path)?;
    tracing::info!("Model checksum (sha256): {}", sha256);

    let classifier = OnnxClassifier::load(&config.model_path, config.inference_threads)
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;

    let labels = Labels::from_file(&config.labels_path)?;
    tracing::info!("Loaded {} labels from {}", labels.len(), config.labels_path.display());

    verify_output_size(&classifier, &labels)?;

    tracing::info!("Model and labels loaded successfully in {:?}", start.elapsed());

    Ok(LoadedModel {
        classifier: Arc::new(classifier),
        labels: Arc::new(labels),
        sha256,
    })
}

fn ensure_exists(path: &Path, what: &str) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("{} file not found at {}", what, path.display());
    }
    Ok(())
}

/// SHA-256 of the artifact, hex encoded.
pub fn file_checksum(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Probe the model with a blank input; the output must have one score per label.
pub fn verify_output_size(classifier: &dyn Classifier, labels: &Labels) -> anyhow::Result<()> {
    let probe = Array4::<f32>::zeros((1, IMAGE_INPUT_SIZE, IMAGE_INPUT_SIZE, CHANNELS));
    let scores = classifier.classify(probe).context("Probe inference failed")?;

    if scores.len() != labels.len() {
        bail!(
            "Model produces {} scores but {} labels were loaded",
            scores.len(),
            labels.len()
        );
    }
    Ok(())
}
