use crate::{
    doc,
    error::ApiError,
    routes::{fallback, health, ocr},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use invoker::Invoker;
use log::error;
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer,
    set_header::SetResponseHeaderLayer,
};

/// Room left in the request body for the JSON around the `image` field
const BODY_OVERHEAD: usize = 64 * 1024;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub invoker: Invoker,
    /// Upper bound on the length of the encoded `image` field
    pub max_image_bytes: usize,
}

impl AppState {
    pub fn new(invoker: Invoker, max_image_bytes: usize) -> Self {
        Self {
            invoker,
            max_image_bytes,
        }
    }
}

/// Turns a handler panic into a JSON error instead of a dropped connection
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!("Handler panicked: {detail}");
    ApiError::Unexpected.into_response()
}

/// Builds the application router.
///
/// CORS headers are set on every response, including errors, unknown routes
/// and panics.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_image_bytes.saturating_add(BODY_OVERHEAD);

    let ocr_vin = post(ocr::ocr_vin)
        .options(ocr::preflight)
        .fallback(fallback::method_not_allowed);

    Router::new()
        .route("/ocrVin", ocr_vin.clone())
        .route("/ocr/vin", ocr_vin)
        .route(
            "/health",
            get(health::health).fallback(fallback::method_not_allowed),
        )
        .route("/api-docs/openapi.json", get(doc::openapi))
        .fallback(fallback::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("POST, OPTIONS"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type"),
                ))
                .layer(CompressionLayer::new())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}
