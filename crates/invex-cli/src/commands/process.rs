//! Process command - triage a single mailbox message.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Deserialize;
use tracing::{debug, info, warn};

use invex_core::models::config::InvexConfig;
use invex_core::models::message::{Attachment, ExtractedText, RawMessage};
use invex_core::models::record::Disposition;
use invex_core::pipeline::ProcessOutcome;

use crate::persist::{resolve_data_dir, Stores};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (message manifest JSON or recovered text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Directory holding the record stores
    #[arg(short, long)]
    store_dir: Option<PathBuf>,

    /// Message UID for plain text input (default: file stem)
    #[arg(long)]
    uid: Option<String>,

    /// Sender address for plain text input
    #[arg(long, default_value = "unknown")]
    sender: String,

    /// Subject line for plain text input
    #[arg(long, default_value = "")]
    subject: String,
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

/// On-disk description of one message and its recovered texts.
#[derive(Deserialize)]
struct MessageManifest {
    uid: String,
    sender: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    attachments: Vec<AttachmentEntry>,
}

#[derive(Deserialize)]
struct AttachmentEntry {
    /// Attachment file name as it appeared in the mailbox.
    name: String,
    /// Path to the recovered text, relative to the manifest.
    #[serde(default)]
    text: Option<PathBuf>,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        InvexConfig::from_file(Path::new(path))?
    } else {
        InvexConfig::default()
    };

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing message file: {}", args.input.display());

    let (message, texts) = load_message(
        &args.input,
        &config,
        args.uid.as_deref(),
        &args.sender,
        &args.subject,
    )?;

    debug!(
        "Message {} carries {} attachments, {} with text",
        message.uid,
        message.attachments.len(),
        texts.len()
    );

    // Open the stores and run the pipeline
    let data_dir = resolve_data_dir(args.store_dir.as_deref(), &config);
    let stores = Stores::open(&data_dir, &config)?;
    let pipeline = stores.pipeline(&config);

    let outcome = pipeline.process(&message, &texts)?;
    log_disposition(&outcome);

    stores.save()?;
    debug!(
        "Stores saved: {} primary, {} recurring records",
        stores.primary.len(),
        stores.recurring.len()
    );

    // Format output
    let output = format_outcome(&outcome, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
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

/// Read one input file into a message and its recovered texts.
///
/// A `.json` input is a message manifest; a `.txt` input becomes a
/// single-attachment message built from the flags.
pub(crate) fn load_message(
    path: &Path,
    config: &InvexConfig,
    uid: Option<&str>,
    sender: &str,
    subject: &str,
) -> anyhow::Result<(RawMessage, ExtractedText)> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => load_manifest(path, config),
        "txt" => load_plain_text(path, uid, sender, subject),
        _ => anyhow::bail!("Unsupported input format: {}", extension),
    }
}

fn load_manifest(path: &Path, config: &InvexConfig) -> anyhow::Result<(RawMessage, ExtractedText)> {
    let content = fs::read_to_string(path)?;
    let manifest: MessageManifest = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("malformed manifest {}: {}", path.display(), e))?;

    // Text paths are resolved relative to the manifest
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut message = RawMessage::new(manifest.uid, manifest.sender, manifest.subject);
    let mut texts = ExtractedText::new();

    for attachment in &manifest.attachments {
        let extension = Path::new(&attachment.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !config.mailbox.accepts_extension(&extension) {
            warn!(
                "Skipping attachment {}: extension not allowed",
                attachment.name
            );
            continue;
        }

        message = message.with_attachment(Attachment::new(attachment.name.clone(), Vec::new()));

        if let Some(text_path) = &attachment.text {
            let resolved = base.join(text_path);
            let text = fs::read_to_string(&resolved).map_err(|e| {
                anyhow::anyhow!("cannot read text file {}: {}", resolved.display(), e)
            })?;
            texts.insert(attachment.name.clone(), text);
        }
    }

    Ok((message, texts))
}

fn load_plain_text(
    path: &Path,
    uid: Option<&str>,
    sender: &str,
    subject: &str,
) -> anyhow::Result<(RawMessage, ExtractedText)> {
    let text = fs::read_to_string(path)?;

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("message.txt")
        .to_string();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("message");
    let uid = uid.unwrap_or(stem);

    let message = RawMessage::new(uid, sender, subject)
        .with_attachment(Attachment::new(filename.clone(), Vec::new()));

    let mut texts = ExtractedText::new();
    texts.insert(filename, text);

    Ok((message, texts))
}

fn log_disposition(outcome: &ProcessOutcome) {
    match outcome.disposition {
        Disposition::New => info!(
            "Message {}: new invoice {} filed",
            outcome.record.message_id, outcome.record.invoice_number
        ),
        Disposition::Duplicate => info!(
            "Message {}: duplicate invoice {}, skipping storage",
            outcome.record.message_id, outcome.record.invoice_number
        ),
        Disposition::Recurring => info!(
            "Message {}: recurring invoice from {}, filed separately",
            outcome.record.message_id, outcome.record.sender
        ),
    }
}

pub(crate) fn format_outcome(
    outcome: &ProcessOutcome,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Csv => format_csv(outcome),
        OutputFormat::Text => format_text(outcome),
    }
}

fn format_csv(outcome: &ProcessOutcome) -> anyhow::Result<String> {
    let record = &outcome.record;
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "message_id",
        "sender",
        "subject",
        "invoice_number",
        "amount",
        "due_date",
        "payment_status",
        "disposition",
    ])?;

    // Write data
    wtr.write_record([
        &record.message_id,
        &record.sender,
        &record.subject,
        &record.invoice_number.to_string(),
        &record.amount.to_string(),
        &record.due_date.to_string(),
        &record.payment_status.to_string(),
        &outcome.disposition.to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(outcome: &ProcessOutcome) -> anyhow::Result<String> {
    let record = &outcome.record;
    let mut output = String::new();

    output.push_str(&format!("Message: {}\n", record.message_id));
    output.push_str(&format!("From: {}\n", record.sender));
    if !record.subject.is_empty() {
        output.push_str(&format!("Subject: {}\n", record.subject));
    }
    if !record.attachment_paths.is_empty() {
        output.push_str(&format!(
            "Attachments: {}\n",
            record.attachment_paths.join(", ")
        ));
    }
    output.push_str("\n");

    output.push_str(&format!("Invoice number: {}\n", record.invoice_number));
    output.push_str(&format!("Amount: {}\n", record.amount));
    output.push_str(&format!("Due date: {}\n", record.due_date));
    output.push_str(&format!("Status: {}\n", record.payment_status));
    output.push_str("\n");

    output.push_str(&format!("Disposition: {}\n", outcome.disposition));

    Ok(output)
}
