use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which path produced a recognition result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OcrMode {
    /// Fixed output from the built-in test engine, no external capability involved
    Test,
    /// Output of a real OCR process or service
    Production,
}

/// Ordered texts recognized in a single image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recognition {
    pub texts: Vec<String>,
    pub mode: OcrMode,
}

impl Recognition {
    pub fn new(texts: Vec<String>, mode: OcrMode) -> Self {
        Self { texts, mode }
    }
}
