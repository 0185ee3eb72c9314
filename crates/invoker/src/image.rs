use crate::error::OcrError;
use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose},
};

/// Standard alphabet, accepting input with or without trailing `=`
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Raw bytes of an image submitted for recognition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData(Vec<u8>);

impl ImageData {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decodes a base64 payload, optionally wrapped in a `data:<mime>;base64,` URL.
    ///
    /// Embedded whitespace (line-wrapped encoders) is ignored.
    pub fn from_base64(encoded: &str) -> Result<Self, OcrError> {
        let payload = match encoded.trim().strip_prefix("data:") {
            Some(url) => url
                .split_once(";base64,")
                .map(|(_, data)| data)
                .ok_or_else(|| OcrError::InvalidImage("data URL is not base64".to_string()))?,
            None => encoded.trim(),
        };

        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = LENIENT
            .decode(compact)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        if bytes.is_empty() {
            return Err(OcrError::InvalidImage("image is empty".to_string()));
        }

        Ok(Self(bytes))
    }

    /// Canonical padded base64 form, as sent to remote engines
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base64() {
        let image = ImageData::from_base64("aGVsbG8=").unwrap();
        assert_eq!(image.as_bytes(), b"hello");

        // Missing padding and surrounding whitespace
        let image = ImageData::from_base64("  aGVsbG8\n").unwrap();
        assert_eq!(image.as_bytes(), b"hello");

        // Line-wrapped payload
        let image = ImageData::from_base64("aGVs\r\nbG8=").unwrap();
        assert_eq!(image.as_bytes(), b"hello");
    }

    #[test]
    fn test_from_data_url() {
        let image = ImageData::from_base64("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(image.as_bytes(), b"hello");

        let err = ImageData::from_base64("data:image/jpeg,hello").unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            ImageData::from_base64("not base64!"),
            Err(OcrError::InvalidImage(_))
        ));
        assert!(matches!(
            ImageData::from_base64("   "),
            Err(OcrError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_to_base64() {
        assert_eq!(ImageData::new(b"hello".to_vec()).to_base64(), "aGVsbG8=");
    }
}
