//! Configuration module

use std::env;
use std::path::PathBuf;

/// Default model artifact location (ONNX export of the Keras classifier)
pub const DEFAULT_MODEL_PATH: &str = "models/brain_tumor_classifier.onnx";

/// Default label mapping location
pub const DEFAULT_LABELS_PATH: &str = "models/labels.json";

/// Uploads are capped at 10 MB by both web frontends
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Serialized model artifact
    pub model_path: PathBuf,

    /// JSON array of class names, aligned with model output positions
    pub labels_path: PathBuf,

    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Request body limit in bytes
    pub max_upload_bytes: usize,

    /// ONNX Runtime intra-op threads (runtime default when unset)
    pub inference_threads: Option<usize>,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels_path: PathBuf::from(DEFAULT_LABELS_PATH),
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            inference_threads: None,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            labels_path: lookup("LABELS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.labels_path),

            host: lookup("HOST").unwrap_or(defaults.host),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),

            inference_threads: lookup("INFERENCE_THREADS")
                .and_then(|t| t.parse().ok())
                .filter(|&t: &usize| t > 0),

            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
