//! Batch processing command for multiple receipt files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use struk_core::{ParsedReceipt, ReceiptParser, RuleBasedParser};
use struk_ocr::{ImageSource, OcrBackend, OcrEngine};

use super::output::{format_receipt, OutputFormat};
use super::{build_parser, engine_kind, file_extension, load_config, EngineArg, StrategyArg};

const TEXT_EXTENSIONS: &[&str] = &["txt"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp", "pdf"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern; `.txt` files are parsed directly, images go through OCR
    #[arg(required = true)]
    input: String,

    /// Output directory (default: stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// OCR engine for image files (overrides config)
    #[arg(short, long, value_enum)]
    engine: Option<EngineArg>,

    /// Merchant name heuristic (overrides config)
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    receipt: Option<ParsedReceipt>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = build_parser(&config, args.strategy)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = file_extension(p);
            TEXT_EXTENSIONS.contains(&ext.as_str()) || IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // Only image files need an engine; text-only batches run without credentials.
    let engine = if files
        .iter()
        .any(|p| IMAGE_EXTENSIONS.contains(&file_extension(p).as_str()))
    {
        Some(OcrEngine::from_config(
            &config.ocr,
            engine_kind(&config, args.engine),
        )?)
    } else {
        None
    };

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &parser, engine.as_ref()).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(receipt) => {
                results.push(ProcessResult {
                    path,
                    receipt: Some(receipt),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        receipt: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    write_outputs(&results, &args)?;

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.receipt.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file(
    path: &Path,
    parser: &RuleBasedParser,
    engine: Option<&OcrEngine>,
) -> anyhow::Result<ParsedReceipt> {
    let extension = file_extension(path);

    let text = if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        fs::read_to_string(path)?
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        let Some(engine) = engine else {
            anyhow::bail!("No OCR engine configured");
        };
        let text = engine
            .recognize(&ImageSource::Path(path.to_path_buf()))
            .await?;
        if text.trim().is_empty() {
            anyhow::bail!("No text extracted from image");
        }
        text
    } else {
        anyhow::bail!("Unsupported file format: {}", extension);
    };

    let result = parser.parse(&text);
    debug!(
        "{}: {} fields, {} warnings",
        path.display(),
        result.receipt.resolved_fields().len(),
        result.warnings.len()
    );

    Ok(result.receipt)
}

fn write_outputs(results: &[ProcessResult], args: &BatchArgs) -> anyhow::Result<()> {
    for result in results {
        let Some(receipt) = &result.receipt else {
            continue;
        };

        let content = match args.format {
            // One compact object per line when streaming to stdout.
            OutputFormat::Json if args.output_dir.is_none() => serde_json::to_string(receipt)?,
            format => format_receipt(receipt, format)?,
        };

        match &args.output_dir {
            Some(output_dir) => {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("receipt");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => println!("{}", content.trim_end()),
        }
    }
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "merchant_name",
        "transaction_date",
        "total_amount",
        "currency",
        "transaction_status",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(receipt) = &result.receipt {
            wtr.write_record([
                filename,
                "success",
                receipt.merchant_name.as_deref().unwrap_or(""),
                &receipt
                    .transaction_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                &receipt
                    .total_amount
                    .map(|a| format!("{:.2}", a))
                    .unwrap_or_default(),
                receipt.currency.as_deref().unwrap_or(""),
                &receipt
                    .transaction_status
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
