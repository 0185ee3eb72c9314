pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod image;
pub mod invoker;

pub use engine::OcrEngine;
pub use error::OcrError;
pub use image::ImageData;
pub use invoker::Invoker;
