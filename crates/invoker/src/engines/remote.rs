//! Delegates OCR to a remote HTTP service.
//!
//! The service accepts `{"image": "<base64>"}` and answers with a JSON object
//! whose `vins` field lists the recognized texts; failures carry an `error`
//! field.

use crate::{engine::OcrEngine, error::OcrError, image::ImageData};
use async_trait::async_trait;
use log::debug;
use models::recognition::OcrMode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct RemoteRequest {
    image: String,
}

#[derive(Debug, Deserialize)]
struct RemoteResponse {
    #[serde(default)]
    vins: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

/// Engine backed by an OCR service reachable over HTTP
#[derive(Debug, Clone)]
pub struct RemoteEngine {
    client: Client,
    url: String,
    timeout: Duration,
}

impl RemoteEngine {
    /// Creates an engine with its own connection pool whose requests give up after `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("vin-ocr-gateway/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }
}

#[async_trait]
impl OcrEngine for RemoteEngine {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn mode(&self) -> OcrMode {
        OcrMode::Production
    }

    async fn recognize(&self, image: &ImageData) -> Result<Vec<String>, OcrError> {
        let request = RemoteRequest {
            image: image.to_base64(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OcrError::Timeout(self.timeout)
                } else if e.is_connect() {
                    OcrError::Unavailable(format!("cannot reach {}: {e}", self.url))
                } else {
                    OcrError::Unexpected(format!("request to {} failed: {e}", self.url))
                }
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OcrError::Timeout(self.timeout)
                } else {
                    OcrError::BadOutput(format!("failed to read response body: {e}"))
                }
            })?;

        debug!("OCR service answered {status} with {} bytes", body.len());

        let parsed = serde_json::from_slice::<RemoteResponse>(&body);

        if !status.is_success() {
            let reason = parsed
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
            return Err(OcrError::BadOutput(format!(
                "OCR service responded with {status}: {reason}"
            )));
        }

        parsed
            .map_err(|e| OcrError::BadOutput(format!("invalid JSON from OCR service: {e}")))?
            .vins
            .ok_or_else(|| {
                OcrError::BadOutput("OCR service response has no `vins` field".to_string())
            })
    }
}
