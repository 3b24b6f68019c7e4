//! Core library for EDC payment receipt parsing.
//!
//! This crate provides:
//! - Line normalization of raw OCR text
//! - A declarative pattern table for terminal/merchant ids, card data,
//!   host reference numbers, totals and footer codes
//! - Merchant name resolution (anchor scan or first-line heuristic)
//! - Rupiah amount normalization and void sign correction
//! - Century-aware date/time resolution
//! - Receipt data models and JSON configuration
//!
//! Parsing is pure and synchronous; OCR lives in `struk-ocr`.

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{Result, StrukError};
pub use models::config::{
    ExtractionConfig, MerchantStrategy, OcrConfig, OcrEngineKind, OcrSpaceConfig, StrukConfig,
    TesseractConfig,
};
pub use models::receipt::{Field, FieldValue, LineItem, ParsedReceipt, TransactionStatus};
pub use receipt::rules::{normalize_amount, parse_rupiah_amount};
pub use receipt::{ExtractionResult, ReceiptParser, RuleBasedParser};

/// Parse raw OCR text with the default settings.
pub fn parse_receipt(text: &str) -> ParsedReceipt {
    RuleBasedParser::new().parse_receipt(text)
}
