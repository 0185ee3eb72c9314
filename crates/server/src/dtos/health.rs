use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Name reported by the health endpoint
pub const SERVICE_NAME: &str = "OCR Functions";

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    #[schema(example = "OCR Functions")]
    pub service: &'static str,
    /// ISO-8601 UTC time the report was generated
    #[schema(example = "2025-01-01T00:00:00.000Z")]
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            service: SERVICE_NAME,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
