//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, RuleBasedParser};

use crate::models::receipt::ParsedReceipt;

/// Trait for receipt parsers.
///
/// Parsing is infallible: whatever cannot be resolved is left out of the
/// record and reported as a warning.
pub trait ReceiptParser {
    /// Parse a receipt from raw OCR text.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Parse and keep only the record.
    fn parse_receipt(&self, text: &str) -> ParsedReceipt {
        self.parse(text).receipt
    }
}
