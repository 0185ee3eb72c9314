use crate::{error::OcrError, image::ImageData};
use async_trait::async_trait;
use models::recognition::OcrMode;

/// An OCR capability that turns an image into recognized text lines.
///
/// Implementations do not enforce a deadline themselves; the [`Invoker`]
/// bounds every call and drops the returned future when the bound is hit, so
/// any resource the future owns must be released on drop.
///
/// [`Invoker`]: crate::invoker::Invoker
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Mode reported alongside results from this engine
    fn mode(&self) -> OcrMode;

    /// Recognizes text in `image`, in reading order.
    ///
    /// An empty vector means the engine ran but found nothing.
    async fn recognize(&self, image: &ImageData) -> Result<Vec<String>, OcrError>;
}
