//! Error handling

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Failures inside the predict pipeline.
///
/// All variants collapse to the same 500 response; the variant only
/// survives into the logs.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("cannot identify image file: {0}")]
    Decode(String),

    #[error("{0}")]
    Shape(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model is not loaded")]
    ModelUnavailable,
}

impl PredictError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Decode(_) => "decode",
            PredictError::Shape(_) => "shape",
            PredictError::Inference(_) => "inference",
            PredictError::ModelUnavailable => "model_unavailable",
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    // Client errors
    InvalidInput(String),
    MissingField(String),
    Upload { status: StatusCode, detail: String },

    // Pipeline errors
    Processing(PredictError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::InvalidInput(msg) => {
                tracing::warn!("Rejected upload: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::MissingField(msg) => {
                tracing::warn!("Rejected upload: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::Upload { status, detail } => {
                tracing::warn!(status = status.as_u16(), "Upload failed: {}", detail);
                (status, detail)
            }
            AppError::Processing(err) => {
                tracing::error!(kind = err.kind(), "Prediction failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error processing image: {}", err),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::Processing(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Upload {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Upload {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}
