//! Receipt data models produced by the parser.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a card transaction as printed on the slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Reversed or cancelled sale.
    Void,
    /// Regular sale.
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Void => "VOID",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "VOID" => Ok(Self::Void),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(format!("unknown transaction status: '{other}'")),
        }
    }
}

/// Every field the parser knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    MerchantName,
    MerchantAddress,
    TransactionDateTime,
    TransactionDate,
    TransactionTime,
    TerminalId,
    MerchantId,
    CardType,
    CardNumberMasked,
    BatchNumber,
    TraceNumber,
    ApprovalCode,
    ReferenceNumber,
    TotalAmount,
    Currency,
    InternalCodeReference,
    TransactionStatus,
    Notes,
}

impl Field {
    /// All fields in output order.
    pub const ALL: [Field; 18] = [
        Field::MerchantName,
        Field::MerchantAddress,
        Field::TransactionDateTime,
        Field::TransactionDate,
        Field::TransactionTime,
        Field::TerminalId,
        Field::MerchantId,
        Field::CardType,
        Field::CardNumberMasked,
        Field::BatchNumber,
        Field::TraceNumber,
        Field::ApprovalCode,
        Field::ReferenceNumber,
        Field::TotalAmount,
        Field::Currency,
        Field::InternalCodeReference,
        Field::TransactionStatus,
        Field::Notes,
    ];

    /// JSON key of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::MerchantName => "merchant_name",
            Field::MerchantAddress => "merchant_address",
            Field::TransactionDateTime => "transaction_date_time",
            Field::TransactionDate => "transaction_date",
            Field::TransactionTime => "transaction_time",
            Field::TerminalId => "terminal_id",
            Field::MerchantId => "merchant_id",
            Field::CardType => "card_type",
            Field::CardNumberMasked => "card_number_masked",
            Field::BatchNumber => "batch_number",
            Field::TraceNumber => "trace_number",
            Field::ApprovalCode => "approval_code",
            Field::ReferenceNumber => "reference_number",
            Field::TotalAmount => "total_amount",
            Field::Currency => "currency",
            Field::InternalCodeReference => "internal_code_reference",
            Field::TransactionStatus => "transaction_status",
            Field::Notes => "notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value produced by a field extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Amount(Decimal),
    Date(NaiveDate),
    Status(TransactionStatus),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Amount(d) => write!(f, "{:.2}", d),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Status(s) => write!(f, "{s}"),
        }
    }
}

/// Single synthesized line item (the slip carries one total, not a basket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// "VOID" for reversed sales, "TOTAL" otherwise.
    pub description: String,

    /// Signed amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Structured record extracted from one receipt.
///
/// Unresolved fields stay `None` and are omitted from JSON; a field is never
/// present with an empty placeholder value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedReceipt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_address: Option<String>,

    /// Date/time token as printed, label stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,

    /// 24-hour `HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number_masked: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,

    /// Signed total; negative for voided sales.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub total_amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_code_reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_status: Option<TransactionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,

    /// OCR text exactly as received.
    pub raw_text: String,
}

impl ParsedReceipt {
    /// Create a record with no resolved fields.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// Store a value for `field`.
    ///
    /// Returns `false` (leaving the record untouched) when the value has the
    /// wrong type for the field or is blank text.
    pub fn set(&mut self, field: Field, value: FieldValue) -> bool {
        match (field, value) {
            (Field::TotalAmount, FieldValue::Amount(amount)) => {
                self.total_amount = Some(amount);
                true
            }
            (Field::TransactionDate, FieldValue::Date(date)) => {
                self.transaction_date = Some(date);
                true
            }
            (Field::TransactionStatus, FieldValue::Status(status)) => {
                self.transaction_status = Some(status);
                true
            }
            (field, FieldValue::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return false;
                }
                match self.text_slot(field) {
                    Some(slot) => {
                        *slot = Some(text.to_string());
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// Current value of `field`, if resolved.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        let text = |v: &Option<String>| v.clone().map(FieldValue::Text);
        match field {
            Field::MerchantName => text(&self.merchant_name),
            Field::MerchantAddress => text(&self.merchant_address),
            Field::TransactionDateTime => text(&self.transaction_date_time),
            Field::TransactionDate => self.transaction_date.map(FieldValue::Date),
            Field::TransactionTime => text(&self.transaction_time),
            Field::TerminalId => text(&self.terminal_id),
            Field::MerchantId => text(&self.merchant_id),
            Field::CardType => text(&self.card_type),
            Field::CardNumberMasked => text(&self.card_number_masked),
            Field::BatchNumber => text(&self.batch_number),
            Field::TraceNumber => text(&self.trace_number),
            Field::ApprovalCode => text(&self.approval_code),
            Field::ReferenceNumber => text(&self.reference_number),
            Field::TotalAmount => self.total_amount.map(FieldValue::Amount),
            Field::Currency => text(&self.currency),
            Field::InternalCodeReference => text(&self.internal_code_reference),
            Field::TransactionStatus => self.transaction_status.map(FieldValue::Status),
            Field::Notes => text(&self.notes),
        }
    }

    /// Fields that currently hold a value, in output order.
    pub fn resolved_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    /// True when nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.resolved_fields().is_empty() && self.line_items.is_empty()
    }

    /// Whether the slip was classified as voided.
    pub fn is_void(&self) -> bool {
        self.transaction_status == Some(TransactionStatus::Void)
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut Option<String>> {
        match field {
            Field::MerchantName => Some(&mut self.merchant_name),
            Field::MerchantAddress => Some(&mut self.merchant_address),
            Field::TransactionDateTime => Some(&mut self.transaction_date_time),
            Field::TransactionTime => Some(&mut self.transaction_time),
            Field::TerminalId => Some(&mut self.terminal_id),
            Field::MerchantId => Some(&mut self.merchant_id),
            Field::CardType => Some(&mut self.card_type),
            Field::CardNumberMasked => Some(&mut self.card_number_masked),
            Field::BatchNumber => Some(&mut self.batch_number),
            Field::TraceNumber => Some(&mut self.trace_number),
            Field::ApprovalCode => Some(&mut self.approval_code),
            Field::ReferenceNumber => Some(&mut self.reference_number),
            Field::Currency => Some(&mut self.currency),
            Field::InternalCodeReference => Some(&mut self.internal_code_reference),
            Field::Notes => Some(&mut self.notes),
            Field::TransactionDate | Field::TotalAmount | Field::TransactionStatus => None,
        }
    }
}
