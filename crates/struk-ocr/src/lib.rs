//! OCR collaborators for struk.
//!
//! The parser in `struk-core` only ever sees text. This crate produces that
//! text from a receipt photo through one of:
//! - the hosted OCR.space web API (feature `ocr-space`)
//! - a local `tesseract` executable (feature `tesseract`)
//! - a fixed string, for tests and replays

pub mod backend;
mod error;

pub use backend::{ImageSource, OcrBackend, OcrEngine, StaticTextBackend};
pub use error::OcrError;

#[cfg(feature = "ocr-space")]
pub use backend::ocr_space::OcrSpaceBackend;

#[cfg(feature = "tesseract")]
pub use backend::tesseract::TesseractBackend;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;
