//! Model Module - loaded classifier and its label mapping

pub mod inference;
pub mod labels;
pub mod loader;

use std::sync::Arc;

pub use inference::{Classifier, Prediction};
pub use labels::Labels;

/// Everything the predict handler needs; built once at startup and only
/// read afterwards.
#[derive(Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub labels: Arc<Labels>,
    pub sha256: String,
}
