use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use narrata_core::constants::DEFAULT_CONTENT_TYPE;
use narrata_core::models::{ErrorEnvelope, SpeechUrlResponse};
use narrata_core::AppError;

use crate::error::HttpAppError;
use crate::services::pipeline::UploadedImage;
use crate::state::AppState;

/// Describe an uploaded image and narrate the description
///
/// Takes the first multipart field carrying a filename as the image. On
/// success the response carries a read-only URL to the WAV narration, valid
/// for ten minutes.
///
/// # Errors
/// - `AppError::MissingFile` - not multipart, or no file field
/// - `AppError::InvalidFileType` - extension outside jpg, jpeg, png, gif, bmp
/// - `AppError::PayloadTooLarge` - body exceeds the upload limit
/// - `AppError::NoDescription` / `AppError::SynthesisFailed` - upstream service gave nothing usable
#[utoipa::path(
    post,
    path = "/api/image_to_speech_http",
    tag = "narration",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Narration stored", body = SpeechUrlResponse),
        (status = 400, description = "Missing file or invalid file type", body = ErrorEnvelope),
        (status = 413, description = "File too large", body = ErrorEnvelope),
        (status = 500, description = "Storage, vision or speech failure", body = ErrorEnvelope)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(
        request_id = %uuid::Uuid::new_v4(),
        operation = "image_to_speech"
    )
)]
pub async fn image_to_speech(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SpeechUrlResponse>, HttpAppError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection.body_text(), "Request is not multipart");
        AppError::MissingFile
    })?;

    let image = read_attached_file(multipart, state.max_upload_bytes).await?;
    tracing::info!(
        filename = %image.filename,
        content_type = %image.content_type,
        size_bytes = image.data.len(),
        "Received file"
    );

    let url = state.pipeline.run(image).await?;

    Ok(Json(SpeechUrlResponse::new(url)))
}

/// First field with a non-empty filename, read fully into memory.
async fn read_attached_file(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<UploadedImage, AppError> {
    let to_app_error = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(max_upload_bytes)
        } else {
            tracing::debug!(error = %err.body_text(), "Malformed multipart body");
            AppError::MissingFile
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(to_app_error)? {
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field.bytes().await.map_err(to_app_error)?;

        return Ok(UploadedImage {
            filename,
            content_type,
            data: data.to_vec(),
        });
    }

    Err(AppError::MissingFile)
}
