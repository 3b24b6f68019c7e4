//! Parse command - extract fields from raw OCR text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use struk_core::ReceiptParser;

use super::output::{emit, format_receipt, print_warnings, OutputFormat};
use super::{build_parser, load_config, StrategyArg};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file with the OCR output, or `-` for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Merchant name heuristic (overrides config)
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Report unresolved key fields on stderr
    #[arg(long)]
    warnings: bool,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let parser = build_parser(&config, args.strategy)?;

    let text = read_input(&args.input)?;
    info!("Parsing {} ({} bytes)", args.input, text.len());

    let result = parser.parse(&text);
    let output = format_receipt(&result.receipt, args.format)?;

    emit(&output, args.output.as_deref())?;

    if args.warnings {
        print_warnings(&result);
    }

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}
