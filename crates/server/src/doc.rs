use crate::{
    dtos::{
        health::HealthResponse,
        ocr::{ErrorResponse, OcrRequest, OcrResponse},
    },
    routes::{health, ocr},
};
use axum::Json;
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(ocr::ocr_vin, ocr::preflight, health::health),
    components(schemas(OcrRequest, OcrResponse, ErrorResponse, HealthResponse)),
    tags(
        (name = "OCR", description = "VIN recognition endpoints"),
        (name = "Health", description = "Service status"),
    ),
    info(
        title = "VIN OCR API",
        version = "1.0.0",
        description = "Gateway to an external OCR engine for Vehicle Identification Numbers",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
