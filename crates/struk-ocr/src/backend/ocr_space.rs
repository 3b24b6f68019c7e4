//! OCR.space web API backend.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use struk_core::models::config::OcrSpaceConfig;
use tracing::{debug, info};

use super::{extension, ImageSource, OcrBackend};
use crate::{OcrError, Result};

const ENGINE: &str = "OCR.space";

/// Backend posting images to the OCR.space parse endpoint.
#[derive(Debug, Clone)]
pub struct OcrSpaceBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
    detect_orientation: bool,
    scale: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    parsed_results: Option<Vec<ParsedResult>>,
    #[serde(default)]
    is_errored_on_processing: bool,
    error_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

impl OcrSpaceResponse {
    fn error_text(&self) -> String {
        match &self.error_message {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join("; "),
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        }
    }
}

impl OcrSpaceBackend {
    /// Backend with default settings and the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = OcrSpaceConfig::default();
        Self {
            client: reqwest::Client::new(),
            endpoint: defaults.endpoint,
            api_key: api_key.into(),
            language: defaults.language,
            detect_orientation: defaults.detect_orientation,
            scale: defaults.scale,
        }
    }

    /// Build from configuration; the key comes from the environment or the config.
    pub fn from_config(config: &OcrSpaceConfig) -> Result<Self> {
        let api_key = config
            .resolve_api_key()
            .filter(|k| !k.trim().is_empty())
            .ok_or(OcrError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            language: config.language.clone(),
            detect_orientation: config.detect_orientation,
            scale: config.scale,
        })
    }

    /// Override the endpoint (self-hosted or pro tier).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set OCR language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn base_form(&self) -> Form {
        Form::new()
            .text("language", self.language.clone())
            .text("isOverlayRequired", "false")
            .text("detectOrientation", self.detect_orientation.to_string())
            .text("scale", self.scale.to_string())
    }

    async fn build_form(&self, source: &ImageSource) -> Result<Form> {
        let form = self.base_form();
        let (data, file_name) = match source {
            ImageSource::Url(url) => return Ok(form.text("url", url.clone())),
            ImageSource::Path(path) => (tokio::fs::read(path).await?, source.file_name()),
            ImageSource::Bytes { data, file_name } => (data.clone(), file_name.clone()),
        };

        debug!("Uploading {} ({} bytes)", file_name, data.len());

        let part = Part::bytes(data)
            .file_name(file_name.clone())
            .mime_str(mime_type(&file_name))?;
        Ok(form.part("file", part))
    }

    /// Extract the text from a parse response body.
    ///
    /// Page texts are joined with newlines. A response flagged as errored
    /// becomes [`OcrError::Service`] carrying the service's message.
    pub fn decode_response(body: &str) -> Result<String> {
        let response: OcrSpaceResponse = serde_json::from_str(body)?;

        if response.is_errored_on_processing {
            return Err(OcrError::Service(response.error_text()));
        }

        let results = response
            .parsed_results
            .filter(|r| !r.is_empty())
            .ok_or(OcrError::EmptyResponse(ENGINE))?;

        Ok(results
            .into_iter()
            .map(|r| r.parsed_text)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl OcrBackend for OcrSpaceBackend {
    fn name(&self) -> &'static str {
        ENGINE
    }

    async fn recognize(&self, source: &ImageSource) -> Result<String> {
        info!("Sending {} to {}", source, self.endpoint);

        let form = self.build_form(source).await?;
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OcrError::Service(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let text = Self::decode_response(&body)?;
        debug!("{} returned {} characters", ENGINE, text.len());
        Ok(text)
    }
}

fn mime_type(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_joins_pages() {
        let body = r#"{
            "ParsedResults": [
                {"ParsedText": "BCA\r\nTOKO MAKMUR JAYA", "FileParseExitCode": 1},
                {"ParsedText": "TOTAL Rp 15.000,50"}
            ],
            "OCRExitCode": 1,
            "IsErroredOnProcessing": false,
            "ProcessingTimeInMilliseconds": "312"
        }"#;
        assert_eq!(
            OcrSpaceBackend::decode_response(body).unwrap(),
            "BCA\r\nTOKO MAKMUR JAYA\nTOTAL Rp 15.000,50"
        );
    }

    #[test]
    fn test_decode_service_error() {
        let body = r#"{
            "OCRExitCode": 99,
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["Unable to recognize the file type", "E216: Unable to detect the file extension"]
        }"#;
        match OcrSpaceBackend::decode_response(body) {
            Err(OcrError::Service(message)) => {
                assert_eq!(
                    message,
                    "Unable to recognize the file type; E216: Unable to detect the file extension"
                );
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_without_results() {
        let body = r#"{"IsErroredOnProcessing": false, "ParsedResults": []}"#;
        assert!(matches!(
            OcrSpaceBackend::decode_response(body),
            Err(OcrError::EmptyResponse(_))
        ));
        assert!(matches!(
            OcrSpaceBackend::decode_response("<html>"),
            Err(OcrError::Json(_))
        ));
    }

    #[test]
    fn test_from_config_with_key() {
        let config = OcrSpaceConfig {
            api_key: Some("test-key".to_string()),
            endpoint: "http://localhost:9/parse".to_string(),
            ..OcrSpaceConfig::default()
        };
        let backend = OcrSpaceBackend::from_config(&config).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:9/parse");
        assert_eq!(backend.name(), "OCR.space");
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type("slip.PNG"), "image/png");
        assert_eq!(mime_type("scan.pdf"), "application/pdf");
        assert_eq!(mime_type("photo"), "image/jpeg");
    }
}
