//! Extract command - extract data from a single contract.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use lotes_core::contract::rules::amounts::format_brl_amount_opt;
use lotes_core::report::write_records;
use lotes_core::{BlockPattern, ContractParser, ExtractionResult, PatternContractParser};

use super::{document_name, load_config, read_document_text};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Block label variant (overrides config)
    #[arg(long, value_enum)]
    block_pattern: Option<BlockPattern>,

    /// Number of leading PDF pages to read (overrides config, 0 = all)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Show fields that could not be found
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let max_pages = args.max_pages.unwrap_or(config.pdf.max_pages);
    let text = read_document_text(&args.input, max_pages)?;

    let parser = PatternContractParser::new()
        .with_block_pattern(args.block_pattern.unwrap_or(config.extraction.block_pattern));
    let result = parser.parse(&document_name(&args.input), &text);

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_result(&result, args.format, &config.export.delimiter)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    delimiter: &str,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_records(&mut buf, std::slice::from_ref(&result.record), delimiter)?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_text(result: &ExtractionResult) -> String {
    let record = &result.record;
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", record.document));
    output.push_str(&format!("Lote:     {}\n", record.lot.as_deref().unwrap_or("-")));
    output.push_str(&format!("Quadra:   {}\n", record.block.as_deref().unwrap_or("-")));
    output.push('\n');

    output.push_str("Amounts:\n");
    output.push_str(&format!("  Total:      {}\n", format_brl_amount_opt(record.total)));
    output.push_str(&format!("  Commission: {}\n", format_brl_amount_opt(record.commission)));
    output.push_str(&format!("  Sum:        {}\n", format_brl_amount_opt(record.sum)));

    if !result.schedule.is_empty() {
        output.push_str("\nPayment schedule:\n");
        for line in &result.schedule {
            output.push_str(&format!(
                "  {} | {} | {}x | {} | {} | {} | {}\n",
                line.description,
                format_brl_amount_opt(line.series_total),
                line.installment_count,
                line.first_due_date,
                format_brl_amount_opt(line.first_installment),
                line.interest_rate,
                line.correction_index,
            ));
        }
    }

    output
}
