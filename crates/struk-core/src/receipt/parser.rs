//! Rule-based receipt parser: runs every resolver and assembles the record.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::{ExtractionConfig, MerchantStrategy};
use crate::models::receipt::{Field, FieldValue, LineItem, ParsedReceipt};

use super::rules::{
    amounts::apply_void_sign, dates::resolve_date_time, lines::RawDocument, FieldExtractor,
    MerchantNameResolver, StatusClassifier, RULES,
};
use super::ReceiptParser;

/// Result of receipt extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted receipt data.
    pub receipt: ParsedReceipt,
    /// Key fields that could not be resolved.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Parser built from the pattern table, the merchant resolver and the
/// status classifier.
///
/// Immutable once built; share it freely between threads.
#[derive(Debug, Clone)]
pub struct RuleBasedParser {
    merchant: MerchantNameResolver,
    status: StatusClassifier,
    default_currency: String,
}

impl RuleBasedParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            merchant: MerchantNameResolver::new(),
            status: StatusClassifier::new(),
            default_currency: ExtractionConfig::default().default_currency,
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            merchant: MerchantNameResolver::from_config(config)?,
            status: StatusClassifier::from_config(config),
            default_currency: config.default_currency.trim().to_string(),
        })
    }

    /// Set the merchant name heuristic.
    pub fn with_strategy(mut self, strategy: MerchantStrategy) -> Self {
        self.merchant = self.merchant.with_strategy(strategy);
        self
    }

    /// Set the anchor token for the anchor scan.
    pub fn with_anchor(mut self, anchor: &str) -> Self {
        self.merchant = self.merchant.with_anchor(anchor);
        self
    }

    /// Set the currency reported alongside a resolved total.
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.default_currency = currency.trim().to_string();
        self
    }

    pub fn strategy(&self) -> MerchantStrategy {
        self.merchant.strategy()
    }

    fn apply_rules(&self, text: &str, receipt: &mut ParsedReceipt) {
        for rule in RULES.iter() {
            let Some(found) = rule.extract(text) else {
                continue;
            };
            if found.is_fallback() {
                debug!(
                    "{} resolved by fallback pattern {} from '{}'",
                    rule.field, found.pattern_index, found.source
                );
            }
            receipt.set(rule.field, found.value);
        }
    }

    fn apply_date_time(&self, receipt: &mut ParsedReceipt) {
        let Some(resolved) = receipt
            .transaction_date_time
            .as_deref()
            .and_then(resolve_date_time)
        else {
            return;
        };

        receipt.set(Field::TransactionDate, FieldValue::Date(resolved.date));
        if let Some(time) = resolved.time {
            receipt.set(Field::TransactionTime, FieldValue::Text(time));
        }
    }

    fn collect_warnings(receipt: &ParsedReceipt) -> Vec<String> {
        let mut warnings = Vec::new();
        if receipt.merchant_name.is_none() {
            warnings.push("Could not extract merchant name".to_string());
        }
        if receipt.transaction_date.is_none() {
            warnings.push("Could not extract transaction date".to_string());
        }
        if receipt.total_amount.is_none() {
            warnings.push("Could not extract total amount".to_string());
        }
        warnings
    }
}

/// `Instant::now` panics on wasm32; timings read zero there.
fn start_timer() -> Option<Instant> {
    if cfg!(target_arch = "wasm32") {
        None
    } else {
        Some(Instant::now())
    }
}

impl Default for RuleBasedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for RuleBasedParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = start_timer();
        let document = RawDocument::new(text);

        info!(
            "Parsing receipt from {} characters ({} lines)",
            text.len(),
            document.lines().len()
        );

        let mut receipt = ParsedReceipt::empty(text);

        if let Some(candidate) = self.merchant.resolve(&document) {
            receipt.set(Field::MerchantName, FieldValue::Text(candidate.text));
        }

        self.apply_rules(text, &mut receipt);
        self.apply_date_time(&mut receipt);

        let is_void = self.status.is_void(text);
        if let Some(total) = receipt.total_amount {
            receipt.total_amount = Some(apply_void_sign(total, is_void));
        }

        if let Some(notes) = self.status.notes(text) {
            receipt.set(Field::Notes, FieldValue::Text(notes));
        }

        // A status on its own would turn unreadable text into a "completed" sale.
        if is_void || !receipt.resolved_fields().is_empty() {
            receipt.set(
                Field::TransactionStatus,
                FieldValue::Status(self.status.classify(text)),
            );
        }

        if let Some(total) = receipt.total_amount {
            receipt.set(Field::Currency, FieldValue::Text(self.default_currency.clone()));
            receipt.line_items = vec![LineItem {
                description: if is_void { "VOID" } else { "TOTAL" }.to_string(),
                amount: total,
            }];
        }

        let warnings = Self::collect_warnings(&receipt);

        debug!(
            "Resolved {} fields ({} warnings)",
            receipt.resolved_fields().len(),
            warnings.len()
        );

        ExtractionResult {
            receipt,
            warnings,
            processing_time_ms: start.map_or(0, |s| s.elapsed().as_millis() as u64),
        }
    }
}
