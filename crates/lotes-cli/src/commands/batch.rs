//! Batch processing command for multiple contracts.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use lotes_core::models::config::LotesConfig;
use lotes_core::report::{
    write_record_reconciliation, write_records, write_schedule, write_schedule_reconciliation,
    write_texts,
};
use lotes_core::{BlockPattern, ContractParser, ExtractionResult, PatternContractParser, Report};

use super::{document_name, is_supported_document, load_config, load_reference, read_document_text};

const RECONCILIATION_FILE: &str = "reconciliation.csv";
const SCHEDULE_RECONCILIATION_FILE: &str = "schedule_reconciliation.csv";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for the CSV reports
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Reference price table (CSV table, or PDF/text document)
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Block label variant (overrides config)
    #[arg(long, value_enum)]
    block_pattern: Option<BlockPattern>,

    /// Number of leading PDF pages to read (overrides config, 0 = all)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// A file that could not be processed.
struct Failure {
    path: PathBuf,
    error: String,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_document(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let max_pages = args.max_pages.unwrap_or(config.pdf.max_pages);
    let parser = PatternContractParser::new()
        .with_block_pattern(args.block_pattern.unwrap_or(config.extraction.block_pattern));

    let mut report = Report::new();
    let mut failures = Vec::new();

    for path in files {
        match process_single_file(&path, &parser, max_pages) {
            Ok(result) => report.push(result),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    failures.push(Failure {
                        path,
                        error: error_msg,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    write_reports(&report, &args.output_dir, &config)?;

    if let Some(reference_path) = &args.reference {
        reconcile_reports(&report, reference_path, &args.output_dir, &config)?;
    }

    // Print summary
    let complete = report
        .records
        .iter()
        .filter(|r| r.sum.is_some())
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.records.len() + failures.len(),
        start.elapsed()
    );
    println!(
        "   {} extracted ({} with total and commission), {} schedule rows, {} failed",
        style(report.records.len()).green(),
        complete,
        report.schedule.len(),
        style(failures.len()).red()
    );

    if !failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in &failures {
            println!("  - {}: {}", failure.path.display(), failure.error);
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &PatternContractParser,
    max_pages: usize,
) -> anyhow::Result<ExtractionResult> {
    let text = read_document_text(path, max_pages)?;
    Ok(parser.parse(&document_name(path), &text))
}

fn write_reports(report: &Report, output_dir: &Path, config: &LotesConfig) -> anyhow::Result<()> {
    let delimiter = &config.export.delimiter;

    let path = output_dir.join("texts.csv");
    write_texts(File::create(&path)?, &report.texts, delimiter)?;
    debug!("Wrote {}", path.display());

    let path = output_dir.join("fields.csv");
    write_records(File::create(&path)?, &report.records, delimiter)?;
    debug!("Wrote {}", path.display());

    let path = output_dir.join("schedule.csv");
    write_schedule(File::create(&path)?, &report.schedule, delimiter)?;
    debug!("Wrote {}", path.display());

    println!(
        "{} Reports written to {}",
        style("✓").green(),
        output_dir.display()
    );

    Ok(())
}

/// Join the report against the reference table and write the results.
///
/// A reference table that cannot be loaded is reported and skipped; the
/// extraction reports are already on disk at this point. Reconciliation
/// files left in `output_dir` by an earlier run are removed in that case.
fn reconcile_reports(
    report: &Report,
    reference_path: &Path,
    output_dir: &Path,
    config: &LotesConfig,
) -> anyhow::Result<()> {
    let records_path = output_dir.join(RECONCILIATION_FILE);
    let schedule_path = output_dir.join(SCHEDULE_RECONCILIATION_FILE);

    let table = match load_reference(reference_path, config) {
        Ok(table) => table,
        Err(e) => {
            for stale in [&records_path, &schedule_path] {
                if stale.exists() {
                    fs::remove_file(stale)?;
                    debug!("Removed stale {}", stale.display());
                }
            }
            eprintln!(
                "{} Reconciliation skipped: {}",
                style("⚠").yellow(),
                e
            );
            return Ok(());
        }
    };

    let reconciliation = report.reconcile(&table);
    let delimiter = &config.export.delimiter;

    write_record_reconciliation(File::create(&records_path)?, &reconciliation.records, delimiter)?;
    debug!("Wrote {}", records_path.display());

    write_schedule_reconciliation(
        File::create(&schedule_path)?,
        &reconciliation.schedule,
        delimiter,
    )?;
    debug!("Wrote {}", schedule_path.display());

    let matched = reconciliation
        .records
        .iter()
        .filter(|r| r.variance.reference_price.is_some())
        .count();

    println!(
        "{} Reconciled {} of {} contracts against {} reference entries",
        style("✓").green(),
        matched,
        reconciliation.records.len(),
        table.len()
    );

    Ok(())
}
