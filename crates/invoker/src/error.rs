use std::time::Duration;
use thiserror::Error;

/// Failures of a single OCR invocation.
///
/// Every message is safe to hand back to the client as-is.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The external capability is not installed or cannot be reached
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
    /// The external capability did not answer within the configured bound
    #[error("OCR engine timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    /// The external capability answered with something we cannot interpret
    #[error("OCR engine returned malformed output: {0}")]
    BadOutput(String),
    /// The submitted image could not be decoded
    #[error("Invalid image encoding: {0}")]
    InvalidImage(String),
    #[error("Unexpected OCR error: {0}")]
    Unexpected(String),
}

impl OcrError {
    /// Whether the failure is the caller's fault rather than the engine's
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidImage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            OcrError::Timeout(Duration::from_millis(1500)).to_string(),
            "OCR engine timed out after 1500ms"
        );
        assert_eq!(
            OcrError::Unavailable("ocr-vin not found".into()).to_string(),
            "OCR engine unavailable: ocr-vin not found"
        );
    }

    #[test]
    fn test_is_client_error() {
        assert!(OcrError::InvalidImage("bad padding".into()).is_client_error());
        assert!(!OcrError::BadOutput("not utf-8".into()).is_client_error());
        assert!(!OcrError::Timeout(Duration::from_secs(1)).is_client_error());
    }
}
