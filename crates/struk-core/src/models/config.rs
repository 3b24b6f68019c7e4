//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration for the struk pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrukConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// OCR collaborator configuration.
    pub ocr: OcrConfig,
}

/// How the merchant name is picked from the line sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MerchantStrategy {
    /// Scan forward from the anchor line, skipping blacklisted lines.
    #[default]
    AnchorScan,
    /// First meaningful line of the slip after light cleanup.
    FirstLine,
}

impl std::fmt::Display for MerchantStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MerchantStrategy::AnchorScan => write!(f, "anchor-scan"),
            MerchantStrategy::FirstLine => write!(f, "first-line"),
        }
    }
}

impl std::str::FromStr for MerchantStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "anchor-scan" | "anchor" => Ok(MerchantStrategy::AnchorScan),
            "first-line" => Ok(MerchantStrategy::FirstLine),
            other => Err(format!("unknown merchant strategy: '{other}'")),
        }
    }
}

/// Receipt field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Merchant name heuristic.
    pub merchant_strategy: MerchantStrategy,

    /// Institution marker printed near the merchant block.
    pub anchor: String,

    /// Extra regexes rejecting merchant-name candidates (added to the built-in set).
    pub exclusion_patterns: Vec<String>,

    /// Lines containing any of these are never taken as the first-line merchant name.
    pub noise_tokens: Vec<String>,

    /// Keywords marking a reversed transaction.
    pub void_keywords: Vec<String>,

    /// Boilerplate phrases copied into `notes` when present.
    pub notes_phrases: Vec<String>,

    /// Currency reported alongside a resolved total.
    pub default_currency: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            merchant_strategy: MerchantStrategy::AnchorScan,
            anchor: "BCA".to_string(),
            exclusion_patterns: Vec::new(),
            noise_tokens: vec!["GRUPECA".to_string()],
            void_keywords: vec!["VOID".to_string()],
            notes_phrases: vec![
                "SIGNATURE NOT REQUIRED".to_string(),
                "NO SIGNATURE REQUIRED".to_string(),
            ],
            default_currency: "IDR".to_string(),
        }
    }
}

/// Which OCR collaborator produces the raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OcrEngineKind {
    /// Hosted OCR.space web API.
    #[default]
    OcrSpace,
    /// Local `tesseract` executable.
    Tesseract,
}

/// OCR collaborator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine used when none is given on the command line.
    pub engine: OcrEngineKind,

    /// OCR.space settings.
    pub ocr_space: OcrSpaceConfig,

    /// Tesseract settings.
    pub tesseract: TesseractConfig,
}

/// OCR.space web API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSpaceConfig {
    /// Parse endpoint.
    pub endpoint: String,

    /// API key; `STRUK_OCRSPACE_API_KEY` takes precedence when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OCR language code.
    pub language: String,

    /// Let the service auto-rotate the image.
    pub detect_orientation: bool,

    /// Let the service upscale low-resolution images.
    pub scale: bool,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrSpaceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.ocr.space/parse/image".to_string(),
            api_key: None,
            language: "eng".to_string(),
            detect_orientation: true,
            scale: true,
            timeout_secs: 60,
        }
    }
}

/// Local tesseract settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Executable name or path.
    pub binary: String,

    /// Language pack(s), `+`-joined.
    pub language: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "ind+eng".to_string(),
        }
    }
}

/// Environment variable holding the OCR.space API key.
pub const OCR_SPACE_KEY_ENV: &str = "STRUK_OCRSPACE_API_KEY";

impl OcrSpaceConfig {
    /// API key from the environment, falling back to the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(OCR_SPACE_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}

impl StrukConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StrukConfig =
            serde_json::from_str(r#"{"extraction": {"merchant_strategy": "first-line"}}"#).unwrap();

        assert_eq!(config.extraction.merchant_strategy, MerchantStrategy::FirstLine);
        assert_eq!(config.extraction.anchor, "BCA");
        assert_eq!(config.ocr.engine, OcrEngineKind::OcrSpace);
        assert_eq!(config.ocr.tesseract.language, "ind+eng");
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("first-line".parse(), Ok(MerchantStrategy::FirstLine));
        assert_eq!("ANCHOR_SCAN".parse(), Ok(MerchantStrategy::AnchorScan));
        assert!("middle".parse::<MerchantStrategy>().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StrukConfig::default();
        config.extraction.anchor = "MANDIRI".to_string();
        config.ocr.engine = OcrEngineKind::Tesseract;
        config.save(&path).unwrap();

        let loaded = StrukConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.anchor, "MANDIRI");
        assert_eq!(loaded.ocr.engine, OcrEngineKind::Tesseract);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(StrukConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_strategy_display_matches_serde() {
        let json = serde_json::to_string(&MerchantStrategy::AnchorScan).unwrap();
        assert_eq!(json, format!("\"{}\"", MerchantStrategy::AnchorScan));
    }
}
