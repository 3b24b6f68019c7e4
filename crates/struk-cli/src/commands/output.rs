//! Output formatting shared by the parse, process and batch commands.

use std::fs;
use std::path::Path;

use console::style;

use struk_core::receipt::rules::format_rupiah;
use struk_core::{ExtractionResult, Field, FieldValue, ParsedReceipt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_receipt(receipt: &ParsedReceipt, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(receipt)?),
        OutputFormat::Csv => format_csv(receipt),
        OutputFormat::Text => Ok(format_text(receipt)),
    }
}

/// One header row with every field, one data row; unresolved cells are empty.
fn format_csv(receipt: &ParsedReceipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(Field::ALL.iter().map(|f| f.as_str()))?;
    wtr.write_record(
        Field::ALL
            .iter()
            .map(|f| receipt.get(*f).map(|v| v.to_string()).unwrap_or_default()),
    )?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(receipt: &ParsedReceipt) -> String {
    let resolved = receipt.resolved_fields();
    if resolved.is_empty() {
        return "No fields recognized.\n".to_string();
    }

    let mut output = String::new();
    for field in resolved {
        let value = match receipt.get(field) {
            Some(FieldValue::Amount(amount)) => format_rupiah(amount),
            Some(value) => value.to_string(),
            None => continue,
        };
        output.push_str(&format!("{:<24} {}\n", label(field), value));
    }
    output
}

fn label(field: Field) -> &'static str {
    match field {
        Field::MerchantName => "Merchant",
        Field::MerchantAddress => "Address",
        Field::TransactionDateTime => "Date/time (printed)",
        Field::TransactionDate => "Date",
        Field::TransactionTime => "Time",
        Field::TerminalId => "Terminal ID",
        Field::MerchantId => "Merchant ID",
        Field::CardType => "Card type",
        Field::CardNumberMasked => "Card number",
        Field::BatchNumber => "Batch",
        Field::TraceNumber => "Trace",
        Field::ApprovalCode => "Approval code",
        Field::ReferenceNumber => "Reference",
        Field::TotalAmount => "Total",
        Field::Currency => "Currency",
        Field::InternalCodeReference => "Internal code",
        Field::TransactionStatus => "Status",
        Field::Notes => "Notes",
    }
}

/// Write to a file when given, stdout otherwise.
pub fn emit(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content.trim_end()),
    }
    Ok(())
}

/// Print unresolved key fields to stderr.
pub fn print_warnings(result: &ExtractionResult) {
    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }
    eprintln!(
        "{} {} fields resolved in {}ms",
        style("ℹ").blue(),
        result.receipt.resolved_fields().len(),
        result.processing_time_ms
    );
}
