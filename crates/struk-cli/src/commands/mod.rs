//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod output;
pub mod parse;
pub mod process;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use tracing::debug;

use struk_core::models::config::{MerchantStrategy, OcrEngineKind, StrukConfig};
use struk_core::RuleBasedParser;

/// Merchant name heuristic, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Scan forward from the anchor line (default)
    AnchorScan,
    /// Take the first meaningful line
    FirstLine,
}

impl From<StrategyArg> for MerchantStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::AnchorScan => MerchantStrategy::AnchorScan,
            StrategyArg::FirstLine => MerchantStrategy::FirstLine,
        }
    }
}

/// OCR engine, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// OCR.space web API
    OcrSpace,
    /// Local tesseract executable
    Tesseract,
}

impl From<EngineArg> for OcrEngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::OcrSpace => OcrEngineKind::OcrSpace,
            EngineArg::Tesseract => OcrEngineKind::Tesseract,
        }
    }
}

/// `<config_dir>/struk/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("struk")
        .join("config.json")
}

/// The config file in effect: `--config` if given, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicitly given file must exist.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<StrukConfig> {
    let path = config_path(explicit);

    if path.exists() {
        debug!("Loading config from {}", path.display());
        return StrukConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    Ok(StrukConfig::default())
}

/// Build the receipt parser from configuration and command-line overrides.
pub fn build_parser(
    config: &StrukConfig,
    strategy: Option<StrategyArg>,
) -> anyhow::Result<RuleBasedParser> {
    let parser = RuleBasedParser::from_config(&config.extraction)
        .context("Invalid extraction configuration")?;

    Ok(match strategy {
        Some(strategy) => parser.with_strategy(strategy.into()),
        None => parser,
    })
}

/// Engine from the command line, else from configuration.
pub fn engine_kind(config: &StrukConfig, arg: Option<EngineArg>) -> OcrEngineKind {
    arg.map(Into::into).unwrap_or(config.ocr.engine)
}

/// Lower-cased extension of a path.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
