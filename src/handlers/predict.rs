//! Prediction handler

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::{AppError, AppResult, AppState};
use crate::error::PredictError;
use crate::model::{inference, LoadedModel, Prediction};
use crate::preprocess;

/// Multipart part carrying the upload
const FILE_FIELD: &str = "file";

/// Classify an uploaded image
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<Prediction>> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_image_content_type(&content_type) {
            return Err(AppError::InvalidInput("File must be an image".to_string()));
        }

        let contents = field.bytes().await?;
        let prediction = classify_upload(state.model.clone(), contents.to_vec()).await?;
        return Ok(Json(prediction));
    }

    Err(AppError::MissingField(format!("Field '{}' is required", FILE_FIELD)))
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

/// Async prediction
async fn classify_upload(
    model: Option<LoadedModel>,
    contents: Vec<u8>,
) -> Result<Prediction, PredictError> {
    let model = model.ok_or(PredictError::ModelUnavailable)?;

    tokio::task::spawn_blocking(move || run_pipeline(&model, &contents))
        .await
        .map_err(|e| PredictError::Inference(format!("Task failed: {}", e)))?
}

/// Decode, preprocess, forward pass, arg-max.
fn run_pipeline(model: &LoadedModel, contents: &[u8]) -> Result<Prediction, PredictError> {
    let image = preprocess::decode_image(contents)?;
    let input = preprocess::preprocess(&image);

    let start_time = std::time::Instant::now();
    let scores = model.classifier.classify(input)?;
    tracing::debug!("Forward pass completed in {:?}", start_time.elapsed());

    inference::top_prediction(&scores, &model.labels)
}
