//! Local tesseract backend.

use std::ffi::OsString;
use std::path::Path;

use struk_core::models::config::TesseractConfig;
use tokio::process::Command;
use tracing::{debug, info};

use super::{extension, ImageSource, OcrBackend};
use crate::{OcrError, Result};

const ENGINE: &str = "tesseract";

/// Backend running the `tesseract` executable as a child process.
#[derive(Debug, Clone)]
pub struct TesseractBackend {
    binary: String,
    language: String,
}

impl TesseractBackend {
    pub fn new() -> Self {
        Self::from_config(&TesseractConfig::default())
    }

    pub fn from_config(config: &TesseractConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            language: config.language.clone(),
        }
    }

    /// Set the language pack(s), e.g. `ind+eng`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the executable.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Arguments for `tesseract <image> stdout -l <lang>`.
    pub fn build_args(&self, image: &Path) -> Vec<OsString> {
        vec![
            image.as_os_str().to_owned(),
            OsString::from("stdout"),
            OsString::from("-l"),
            OsString::from(&self.language),
        ]
    }

    async fn run(&self, image: &Path) -> Result<String> {
        debug!("Running {} {:?}", self.binary, self.build_args(image));

        let output = Command::new(&self.binary)
            .args(self.build_args(image))
            .output()
            .await
            .map_err(|e| OcrError::EngineFailed {
                engine: ENGINE,
                message: format!("could not start '{}': {}", self.binary, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::EngineFailed {
                engine: ENGINE,
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        ENGINE
    }

    async fn recognize(&self, source: &ImageSource) -> Result<String> {
        info!("Running {} on {}", ENGINE, source);

        match source {
            ImageSource::Path(path) => self.run(path).await,
            ImageSource::Bytes { data, file_name } => {
                let suffix = extension(file_name)
                    .map(|e| format!(".{e}"))
                    .unwrap_or_default();
                let staged = tempfile::Builder::new()
                    .prefix("struk-")
                    .suffix(&suffix)
                    .tempfile()?;
                tokio::fs::write(staged.path(), data).await?;
                self.run(staged.path()).await
            }
            ImageSource::Url(_) => Err(OcrError::UnsupportedSource {
                engine: ENGINE,
                kind: source.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_args() {
        let backend = TesseractBackend::new();
        let args = backend.build_args(Path::new("/tmp/slip.png"));
        assert_eq!(
            args,
            vec![
                OsString::from("/tmp/slip.png"),
                OsString::from("stdout"),
                OsString::from("-l"),
                OsString::from("ind+eng"),
            ]
        );
    }

    #[test]
    fn test_from_config() {
        let config = TesseractConfig {
            binary: "/opt/tesseract/bin/tesseract".to_string(),
            language: "eng".to_string(),
        };
        let backend = TesseractBackend::from_config(&config);
        assert_eq!(backend.build_args(Path::new("a.jpg"))[3], OsString::from("eng"));
    }

    #[tokio::test]
    async fn test_url_is_rejected() {
        let backend = TesseractBackend::new();
        let result = backend
            .recognize(&ImageSource::Url("https://example.com/slip.jpg".to_string()))
            .await;
        assert!(matches!(
            result,
            Err(OcrError::UnsupportedSource { engine: "tesseract", kind: "URL" })
        ));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let backend = TesseractBackend::new().with_binary("struk-test-no-such-tesseract");
        let result = backend
            .recognize(&ImageSource::Bytes {
                data: vec![0xFF, 0xD8, 0xFF],
                file_name: "slip.jpg".to_string(),
            })
            .await;
        assert!(matches!(result, Err(OcrError::EngineFailed { .. })));
    }
}
