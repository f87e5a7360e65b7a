//! Batch processing command for multiple message files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use invex_core::extract::rules::parse_amount;
use invex_core::models::config::InvexConfig;
use invex_core::models::record::Disposition;
use invex_core::pipeline::{Pipeline, ProcessOutcome};

use super::process::load_message;
use crate::persist::{resolve_data_dir, Stores};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Write the full JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Only process messages whose sender contains this text
    #[arg(long)]
    filter_sender: Option<String>,

    /// Only process messages whose subject contains this text
    #[arg(long)]
    filter_subject: Option<String>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Directory holding the record stores
    #[arg(short, long)]
    store_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct BatchResult {
    path: PathBuf,
    outcome: Option<ProcessOutcome>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        InvexConfig::from_file(Path::new(path))?
    } else {
        InvexConfig::default()
    };

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "json" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} message files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Open the stores once; classifications accumulate across the run
    let data_dir = resolve_data_dir(args.store_dir.as_deref(), &config);
    let stores = Stores::open(&data_dir, &config)?;
    let pipeline = stores.pipeline(&config);

    // Set up progress bar
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Each message is classified against everything processed before
    // it, so the files run strictly in sequence.
    let mut results = Vec::with_capacity(files.len());
    let mut filtered = 0usize;

    for path in files {
        match process_single_file(&path, &config, &pipeline, &args) {
            Ok(Some(outcome)) => {
                results.push(BatchResult {
                    path,
                    outcome: Some(outcome),
                    error: None,
                });
            }
            Ok(None) => {
                debug!("Filtered out {}", path.display());
                filtered += 1;
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(BatchResult {
                        path,
                        outcome: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    // Persist the updated collections
    stores.save()?;
    debug!(
        "Stores saved: {} primary, {} recurring records",
        stores.primary.len(),
        stores.recurring.len()
    );

    let successful: Vec<_> = results.iter().filter(|r| r.outcome.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    // Disposition tally and euro total of the newly filed invoices
    let mut new_count = 0usize;
    let mut duplicate_count = 0usize;
    let mut recurring_count = 0usize;
    let mut new_total = Decimal::ZERO;

    for result in &successful {
        if let Some(outcome) = &result.outcome {
            match outcome.disposition {
                Disposition::New => {
                    new_count += 1;
                    if let Some(value) = outcome.record.amount.as_deref().and_then(parse_amount) {
                        new_total += value;
                    }
                }
                Disposition::Duplicate => duplicate_count += 1,
                Disposition::Recurring => recurring_count += 1,
            }
        }
    }

    // Write the full report if requested
    if let Some(report_path) = &args.output {
        let outcomes: Vec<_> = successful
            .iter()
            .filter_map(|r| r.outcome.as_ref())
            .collect();
        fs::write(report_path, serde_json::to_string_pretty(&outcomes)?)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = PathBuf::from("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} filtered out",
        style(successful.len()).green(),
        style(failed.len()).red(),
        filtered
    );
    println!(
        "   {} new, {} recurring, {} duplicate",
        style(new_count).green(),
        style(recurring_count).cyan(),
        style(duplicate_count).yellow()
    );
    println!("   €{} in newly filed invoices", new_total);

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Load one file, apply the filters, and run it through the pipeline.
///
/// Returns `Ok(None)` when the message was filtered out before
/// processing.
fn process_single_file(
    path: &Path,
    config: &InvexConfig,
    pipeline: &Pipeline,
    args: &BatchArgs,
) -> anyhow::Result<Option<ProcessOutcome>> {
    let (message, texts) = load_message(path, config, None, "unknown", "")?;

    if let Some(filter) = &args.filter_sender {
        if !message
            .sender
            .to_lowercase()
            .contains(&filter.to_lowercase())
        {
            return Ok(None);
        }
    }

    if let Some(filter) = &args.filter_subject {
        if !message
            .subject
            .to_lowercase()
            .contains(&filter.to_lowercase())
        {
            return Ok(None);
        }
    }

    let outcome = pipeline.process(&message, &texts)?;
    Ok(Some(outcome))
}

fn write_summary(path: &PathBuf, results: &[BatchResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "message_id",
        "sender",
        "invoice_number",
        "amount",
        "due_date",
        "payment_status",
        "disposition",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(outcome) = &result.outcome {
            let record = &outcome.record;
            wtr.write_record([
                filename,
                "success",
                &record.message_id,
                &record.sender,
                &record.invoice_number.to_string(),
                &record.amount.to_string(),
                &record.due_date.to_string(),
                &record.payment_status.to_string(),
                outcome.disposition.label(),
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
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
