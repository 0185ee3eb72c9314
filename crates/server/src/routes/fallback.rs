use crate::error::ApiError;

/// Answers requests for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Answers requests with a method a known path does not accept
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
