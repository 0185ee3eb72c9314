use crate::{
    app::AppState,
    dtos::ocr::{ErrorResponse, OcrRequest, OcrResponse},
    error::ApiError,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use invoker::ImageData;
use log::info;

/// Recognize VINs in a base64 encoded image
#[utoipa::path(
    post,
    path = "/ocrVin",
    request_body = OcrRequest,
    responses(
        (status = 200, description = "Image processed", body = OcrResponse),
        (status = 400, description = "Image missing or not valid base64", body = ErrorResponse),
        (status = 413, description = "Image larger than the configured maximum", body = ErrorResponse),
        (status = 500, description = "OCR engine failed, timed out or is unavailable", body = ErrorResponse)
    ),
    tag = "OCR"
)]
pub async fn ocr_vin(
    State(state): State<AppState>,
    payload: Result<Json<OcrRequest>, JsonRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let Json(request) = payload?;

    let encoded = request
        .image
        .filter(|image| !image.is_empty())
        .ok_or(ApiError::MissingImage)?;

    info!("OCR request received, image size: {}", encoded.len());

    if encoded.len() > state.max_image_bytes {
        return Err(ApiError::ImageTooLarge {
            limit: state.max_image_bytes,
        });
    }

    // Decoding failures are the client's fault, so the engine is never involved
    let image = ImageData::from_base64(&encoded)?;
    let recognition = state.invoker.recognize(&image).await?;

    info!(
        "OCR completed with {} VIN(s) ({} mode)",
        recognition.texts.len(),
        recognition.mode
    );

    Ok(Json(recognition.into()))
}

/// CORS pre-flight for the OCR endpoint
#[utoipa::path(
    options,
    path = "/ocrVin",
    responses(
        (status = 204, description = "Pre-flight accepted")
    ),
    tag = "OCR"
)]
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
