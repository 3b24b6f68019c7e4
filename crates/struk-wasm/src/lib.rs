//! WASM bindings for EDC payment receipt parsing.
//!
//! OCR happens on the JavaScript side; these bindings take the recognized
//! text and return the structured receipt as a plain JS object.

use js_sys::Array;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use struk_core::models::config::{ExtractionConfig, MerchantStrategy};
use struk_core::receipt::rules::{format_rupiah, parse_rupiah_amount};
use struk_core::{Field, ParsedReceipt, ReceiptParser, RuleBasedParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse receipt text with the default settings.
///
/// Unresolved fields are absent from the returned object.
#[wasm_bindgen]
pub fn parse_receipt(text: &str) -> Result<JsValue, JsValue> {
    to_js(&struk_core::parse_receipt(text))
}

/// Parse a rupiah amount such as `Rp 15.000,50`.
#[wasm_bindgen]
pub fn normalize_amount(text: &str) -> Option<f64> {
    parse_rupiah_amount(text).and_then(|d| d.to_string().parse().ok())
}

/// Format an amount in receipt style (`Rp 15.000,50`).
#[wasm_bindgen]
pub fn format_amount(amount: f64) -> Option<String> {
    Decimal::try_from(amount)
        .ok()
        .map(|d| format_rupiah(d.round_dp(2)))
}

/// JSON keys of every field the parser can emit, in output order.
#[wasm_bindgen]
pub fn supported_fields() -> Array {
    Field::ALL
        .iter()
        .map(|f| JsValue::from_str(f.as_str()))
        .collect()
}

#[derive(Serialize)]
struct ExtractResult {
    receipt: ParsedReceipt,
    warnings: Vec<String>,
    processing_time_ms: u64,
}

/// Receipt extractor class for browser use.
#[wasm_bindgen]
pub struct ReceiptExtractor {
    config: ExtractionConfig,
    parser: RuleBasedParser,
    log_warnings: bool,
}

#[wasm_bindgen]
impl ReceiptExtractor {
    /// Create a new receipt extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            parser: RuleBasedParser::new(),
            log_warnings: false,
        }
    }

    /// Build an extractor from an extraction config object.
    ///
    /// Missing keys take their defaults.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> Result<ReceiptExtractor, JsValue> {
        let config: ExtractionConfig = serde_wasm_bindgen::from_value(config)?;
        let parser =
            RuleBasedParser::from_config(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            config,
            parser,
            log_warnings: false,
        })
    }

    /// Choose the merchant name heuristic (`anchor-scan` or `first-line`).
    #[wasm_bindgen]
    pub fn set_strategy(&mut self, strategy: &str) -> Result<(), JsValue> {
        self.config.merchant_strategy = strategy
            .parse::<MerchantStrategy>()
            .map_err(|e| JsValue::from_str(&e))?;
        self.rebuild()
    }

    /// Set the institution marker the anchor scan starts from.
    #[wasm_bindgen]
    pub fn set_anchor(&mut self, anchor: &str) -> Result<(), JsValue> {
        self.config.anchor = anchor.to_string();
        self.rebuild()
    }

    /// Log extraction warnings to the browser console.
    #[wasm_bindgen]
    pub fn set_log_warnings(&mut self, enabled: bool) {
        self.log_warnings = enabled;
    }

    /// Current merchant name heuristic.
    #[wasm_bindgen(getter)]
    pub fn strategy(&self) -> String {
        self.parser.strategy().to_string()
    }

    /// Extract the receipt from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);
        self.report(&result.warnings);
        to_js(&result.receipt)
    }

    /// Extract the receipt along with warnings and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);
        self.report(&result.warnings);

        to_js(&ExtractResult {
            receipt: result.receipt,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        })
    }

    fn rebuild(&mut self) -> Result<(), JsValue> {
        self.parser = RuleBasedParser::from_config(&self.config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(())
    }

    fn report(&self, warnings: &[String]) {
        if !self.log_warnings {
            return;
        }
        for warning in warnings {
            web_sys::console::warn_1(&JsValue::from_str(warning));
        }
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_normalize_amount() {
        let amount = normalize_amount("Rp 15.000,50").unwrap();
        assert!((amount - 15000.5).abs() < 0.001);
        assert_eq!(normalize_amount("-Rp 5.000,00"), Some(-5000.0));
        assert_eq!(normalize_amount("Rp"), None);
    }

    #[wasm_bindgen_test]
    fn test_format_amount() {
        assert_eq!(format_amount(15000.5).as_deref(), Some("Rp 15.000,50"));
        assert_eq!(format_amount(f64::NAN), None);
    }

    #[wasm_bindgen_test]
    fn test_supported_fields() {
        let fields = supported_fields();
        assert_eq!(fields.length(), 18);
        assert_eq!(fields.get(0).as_string().as_deref(), Some("merchant_name"));
    }

    #[wasm_bindgen_test]
    fn test_extractor_strategy() {
        let mut extractor = ReceiptExtractor::new();
        assert_eq!(extractor.strategy(), "anchor-scan");

        extractor.set_strategy("first-line").unwrap();
        assert_eq!(extractor.strategy(), "first-line");
        assert!(extractor.set_strategy("sideways").is_err());
    }

    #[wasm_bindgen_test]
    fn test_extract_returns_object() {
        let mut extractor = ReceiptExtractor::new();
        extractor.set_anchor("MANDIRI").unwrap();

        let value = extractor
            .extract("MANDIRI\nSATE KHAS SENAYAN\nTOTAL Rp 50.000")
            .unwrap();
        let receipt: ParsedReceipt = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(receipt.merchant_name.as_deref(), Some("SATE KHAS SENAYAN"));
    }
}
