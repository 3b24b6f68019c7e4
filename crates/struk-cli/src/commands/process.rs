//! Process command - OCR a single receipt image, then parse it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use struk_core::ReceiptParser;
use struk_ocr::{ImageSource, OcrBackend, OcrEngine};

use super::output::{emit, format_receipt, print_warnings, OutputFormat};
use super::{build_parser, engine_kind, load_config, EngineArg, StrategyArg};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Receipt image file
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Receipt image URL (sent to the OCR service as-is)
    #[arg(long)]
    url: Option<String>,

    /// OCR engine (overrides config)
    #[arg(short, long, value_enum)]
    engine: Option<EngineArg>,

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

    /// Print the raw OCR text on stderr before parsing
    #[arg(long)]
    show_text: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = build_parser(&config, args.strategy)?;

    let source = match (&args.input, &args.url) {
        (_, Some(url)) => ImageSource::Url(url.clone()),
        (Some(path), None) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            ImageSource::Path(path.clone())
        }
        (None, None) => anyhow::bail!("Give an image file or --url"),
    };

    let engine = OcrEngine::from_config(&config.ocr, engine_kind(&config, args.engine))?;

    info!("Processing {} with {}", source, engine.name());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Running OCR ({})...", engine.name()));

    let text = match engine.recognize(&source).await {
        Ok(text) => text,
        Err(e) => {
            pb.finish_and_clear();
            anyhow::bail!("OCR failed for {}: {}", source, e);
        }
    };

    if text.trim().is_empty() {
        pb.finish_and_clear();
        anyhow::bail!("No text extracted from {}", source);
    }

    pb.set_message("Extracting receipt data...");
    let result = parser.parse(&text);
    pb.finish_and_clear();

    if args.show_text {
        eprintln!("{}", style("--- OCR text ---").dim());
        eprintln!("{}", text.trim_end());
        eprintln!("{}", style("----------------").dim());
    }

    let output = format_receipt(&result.receipt, args.format)?;
    emit(&output, args.output.as_deref())?;

    if args.warnings {
        print_warnings(&result);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
