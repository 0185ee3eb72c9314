use crate::dtos::ocr::ErrorResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use invoker::OcrError;
use log::{error, warn};
use thiserror::Error;

/// Every way a request can fail; each one renders as an [`ErrorResponse`]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Image required")]
    MissingImage,
    #[error("Image exceeds maximum size of {limit} bytes")]
    ImageTooLarge { limit: usize },
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    Ocr(#[from] OcrError),
    #[error("Unexpected error")]
    Unexpected,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingImage => StatusCode::BAD_REQUEST,
            Self::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidBody(rejection) => rejection.status(),
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Ocr(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Ocr(_) | Self::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!("Request failed ({status}): {message}");
        } else {
            warn!("Rejected request ({status}): {message}");
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
