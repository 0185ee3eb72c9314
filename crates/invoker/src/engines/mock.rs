use crate::{engine::OcrEngine, error::OcrError, image::ImageData};
use async_trait::async_trait;
use models::recognition::OcrMode;

/// Fixed VINs reported by the test engine
pub const MOCK_VINS: [&str; 2] = ["1HGBH41JXMN109186", "WBAFR9C50CC123456"];

/// Stand-in engine used when no real OCR capability is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct MockEngine;

#[async_trait]
impl OcrEngine for MockEngine {
    fn name(&self) -> &'static str {
        "test"
    }

    fn mode(&self) -> OcrMode {
        OcrMode::Test
    }

    async fn recognize(&self, _image: &ImageData) -> Result<Vec<String>, OcrError> {
        Ok(MOCK_VINS.iter().map(|vin| vin.to_string()).collect())
    }
}
