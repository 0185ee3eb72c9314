use models::recognition::{OcrMode, Recognition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OcrRequest {
    /// Base64 encoded image, optionally as a `data:` URL
    #[schema(example = "aGVsbG8=")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OcrResponse {
    pub success: bool,
    /// Recognized VIN candidates, best first
    pub vins: Vec<String>,
    /// Always the length of `vins`
    pub count: usize,
    #[schema(value_type = String, example = "production")]
    pub mode: OcrMode,
}

impl From<Recognition> for OcrResponse {
    fn from(recognition: Recognition) -> Self {
        Self {
            success: true,
            count: recognition.texts.len(),
            vins: recognition.texts,
            mode: recognition.mode,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    #[schema(example = "Image required")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
