//! The declarative rule table: one entry per pattern-extracted field.

use lazy_static::lazy_static;

use crate::models::receipt::{Field, FieldValue};

use super::amounts::parse_rupiah_amount;
use super::lines::collapse_whitespace;
use super::patterns::*;
use super::ExtractionRule;

/// Merchant ids are printed zero-padded; the host id is the last 9 digits.
const MERCHANT_ID_DIGITS: usize = 9;

lazy_static! {
    /// Every pattern-driven field with its fallbacks in priority order.
    pub static ref RULES: Vec<ExtractionRule> = vec![
        ExtractionRule::new(Field::TransactionDateTime)
            .pattern(&DATE_TIME_LABELED, 1, date_time_token)
            .pattern(&DATE_TIME_BARE, 1, date_time_token),
        ExtractionRule::new(Field::TerminalId)
            .pattern(&TERMINAL_MERCHANT_LINE, 1, text)
            .pattern(&TERMINAL_ID, 1, text),
        ExtractionRule::new(Field::MerchantId)
            .pattern(&TERMINAL_MERCHANT_LINE, 2, merchant_id)
            .pattern(&MERCHANT_ID, 1, merchant_id),
        ExtractionRule::new(Field::CardType)
            .pattern(&CARD_TYPE_LABELED, 1, collapsed_text)
            .pattern(&CARD_TYPE_DEBIT, 1, collapsed_text),
        ExtractionRule::new(Field::CardNumberMasked).pattern(&CARD_NUMBER_MASKED, 1, text),
        ExtractionRule::new(Field::BatchNumber).pattern(&BATCH_NUMBER, 1, text),
        ExtractionRule::new(Field::TraceNumber).pattern(&TRACE_NUMBER, 1, text),
        ExtractionRule::new(Field::ApprovalCode).pattern(&APPROVAL_CODE, 1, text),
        ExtractionRule::new(Field::ReferenceNumber).pattern(&REFERENCE_NUMBER, 1, text),
        ExtractionRule::new(Field::TotalAmount)
            .pattern(&TOTAL_LABELED, 1, amount)
            .pattern(&TOTAL_NEGATIVE, 1, amount)
            .pattern(&AMOUNT_ANY, 1, amount),
        ExtractionRule::new(Field::InternalCodeReference)
            .pattern(&INTERNAL_CODE_REFERENCE, 1, internal_code),
        ExtractionRule::new(Field::MerchantAddress).pattern(&MERCHANT_ADDRESS, 1, collapsed_text),
    ];
}

/// The rule for a field, if that field is pattern-driven.
pub fn rule_for(field: Field) -> Option<&'static ExtractionRule> {
    RULES.iter().find(|r| r.field == field)
}

fn text(s: &str) -> Option<FieldValue> {
    let s = s.trim();
    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
}

fn collapsed_text(s: &str) -> Option<FieldValue> {
    text(&collapse_whitespace(s))
}

fn date_time_token(s: &str) -> Option<FieldValue> {
    collapsed_text(&DATE_TIME_LABEL_PREFIX.replace(s, ""))
}

fn merchant_id(s: &str) -> Option<FieldValue> {
    let digits = s.trim();
    let id = if digits.len() >= MERCHANT_ID_DIGITS {
        &digits[digits.len() - MERCHANT_ID_DIGITS..]
    } else {
        digits
    };
    text(id)
}

/// Codes carry at least one digit; `VISA/CREDIT` style pairs are card labels.
fn internal_code(s: &str) -> Option<FieldValue> {
    if s.chars().any(|c| c.is_ascii_digit()) {
        text(s)
    } else {
        None
    }
}

fn amount(s: &str) -> Option<FieldValue> {
    parse_rupiah_amount(s).map(FieldValue::Amount)
}
