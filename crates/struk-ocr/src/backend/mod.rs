//! OCR backend implementations.

#[cfg(feature = "ocr-space")]
pub mod ocr_space;

#[cfg(feature = "tesseract")]
pub mod tesseract;

use std::future::Future;
use std::path::{Path, PathBuf};

use struk_core::models::config::{OcrConfig, OcrEngineKind};

use crate::{OcrError, Result};

/// Where the receipt image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image file on disk.
    Path(PathBuf),
    /// Image already in memory; the file name carries the format extension.
    Bytes { data: Vec<u8>, file_name: String },
    /// Publicly reachable image URL.
    Url(String),
}

impl ImageSource {
    /// Treat `http://` and `https://` arguments as URLs, everything else as a path.
    pub fn from_arg(arg: &str) -> Self {
        let lower = arg.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path(_) => "file",
            Self::Bytes { .. } => "byte buffer",
            Self::Url(_) => "URL",
        }
    }

    /// File name used when uploading or staging the image.
    pub fn file_name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "receipt.jpg".to_string()),
            Self::Bytes { file_name, .. } => file_name.clone(),
            Self::Url(url) => url
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("receipt.jpg")
                .to_string(),
        }
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bytes { data, file_name } => write!(f, "{} ({} bytes)", file_name, data.len()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Trait for OCR engines: image in, raw text out.
///
/// Implementations do not retry and do not interpret the text.
pub trait OcrBackend: Send + Sync {
    /// Short engine name for logs and messages.
    fn name(&self) -> &'static str;

    /// Recognize all text in the image, pages joined by newlines.
    fn recognize(&self, source: &ImageSource) -> impl Future<Output = Result<String>> + Send;
}

/// Backend returning fixed text for every image.
#[derive(Debug, Clone, Default)]
pub struct StaticTextBackend {
    text: String,
}

impl StaticTextBackend {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for StaticTextBackend {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn recognize(&self, _source: &ImageSource) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Any of the available backends, chosen at runtime.
#[derive(Debug)]
pub enum OcrEngine {
    #[cfg(feature = "ocr-space")]
    OcrSpace(ocr_space::OcrSpaceBackend),
    #[cfg(feature = "tesseract")]
    Tesseract(tesseract::TesseractBackend),
    Static(StaticTextBackend),
}

impl OcrEngine {
    /// Build the engine of the given kind from configuration.
    pub fn from_config(config: &OcrConfig, kind: OcrEngineKind) -> Result<Self> {
        match kind {
            #[cfg(feature = "ocr-space")]
            OcrEngineKind::OcrSpace => Ok(Self::OcrSpace(
                ocr_space::OcrSpaceBackend::from_config(&config.ocr_space)?,
            )),
            #[cfg(feature = "tesseract")]
            OcrEngineKind::Tesseract => Ok(Self::Tesseract(
                tesseract::TesseractBackend::from_config(&config.tesseract),
            )),
            #[allow(unreachable_patterns)]
            other => Err(OcrError::Unavailable(format!("{other:?}"))),
        }
    }
}

impl OcrBackend for OcrEngine {
    fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "ocr-space")]
            Self::OcrSpace(backend) => backend.name(),
            #[cfg(feature = "tesseract")]
            Self::Tesseract(backend) => backend.name(),
            Self::Static(backend) => backend.name(),
        }
    }

    async fn recognize(&self, source: &ImageSource) -> Result<String> {
        match self {
            #[cfg(feature = "ocr-space")]
            Self::OcrSpace(backend) => backend.recognize(source).await,
            #[cfg(feature = "tesseract")]
            Self::Tesseract(backend) => backend.recognize(source).await,
            Self::Static(backend) => backend.recognize(source).await,
        }
    }
}

/// Extension of a file name, lower-cased, without the dot.
pub(crate) fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_from_arg() {
        assert_eq!(
            ImageSource::from_arg("https://example.com/slip.png"),
            ImageSource::Url("https://example.com/slip.png".to_string())
        );
        assert_eq!(
            ImageSource::from_arg("photos/slip.jpg"),
            ImageSource::Path(PathBuf::from("photos/slip.jpg"))
        );
    }

    #[test]
    fn test_source_file_name() {
        assert_eq!(ImageSource::from_arg("a/b/slip.JPG").file_name(), "slip.JPG");
        assert_eq!(ImageSource::from_arg("http://host/x/scan.png").file_name(), "scan.png");
        assert_eq!(ImageSource::from_arg("http://host/").file_name(), "receipt.jpg");
        assert_eq!(extension("slip.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension("slip"), None);
    }

    #[tokio::test]
    async fn test_static_backend() {
        let engine = OcrEngine::Static(StaticTextBackend::new("BCA\nTOTAL Rp 1.000"));
        let text = engine
            .recognize(&ImageSource::from_arg("ignored.png"))
            .await
            .unwrap();
        assert_eq!(engine.name(), "static");
        assert_eq!(text, "BCA\nTOTAL Rp 1.000");
    }
}
