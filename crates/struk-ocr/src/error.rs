//! Error types for the OCR collaborators.

use thiserror::Error;

/// Errors that can occur while turning an image into text.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Reading the image or a temporary file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request to the OCR service failed.
    #[cfg(feature = "ocr-space")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The OCR service answered but reported a failure.
    #[error("OCR service error: {0}")]
    Service(String),

    /// No API key in the environment or the configuration.
    #[error("missing OCR.space API key (set STRUK_OCRSPACE_API_KEY or ocr.ocr_space.api_key)")]
    MissingApiKey,

    /// The engine cannot read this kind of source.
    #[error("{engine} cannot read images from a {kind}")]
    UnsupportedSource {
        engine: &'static str,
        kind: &'static str,
    },

    /// The engine was not compiled into this build.
    #[error("OCR engine '{0}' is not available in this build")]
    Unavailable(String),

    /// The local engine could not be started or exited with an error.
    #[error("{engine} failed: {message}")]
    EngineFailed {
        engine: &'static str,
        message: String,
    },

    /// The service answered without any parsed result.
    #[error("{0} returned no parsed results")]
    EmptyResponse(&'static str),

    /// The service response could not be decoded.
    #[error("invalid response: {0}")]
    Json(#[from] serde_json::Error),
}
