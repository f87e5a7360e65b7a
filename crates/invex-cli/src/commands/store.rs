//! Store command - inspect the persisted record collections.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use invex_core::models::config::InvexConfig;
use invex_core::models::record::{InvoiceRecord, PaymentStatus};

use crate::persist::{resolve_data_dir, Stores};

/// Arguments for the store command.
#[derive(Args)]
pub struct StoreArgs {
    #[command(subcommand)]
    command: StoreCommand,
}

#[derive(Subcommand)]
enum StoreCommand {
    /// List stored invoice records
    List(ListArgs),

    /// Show store statistics
    Stats(StatsArgs),
}

#[derive(Args)]
struct ListArgs {
    /// List the recurring collection instead of the primary one
    #[arg(long)]
    recurring: bool,

    /// Print the records as JSON
    #[arg(long)]
    json: bool,

    /// Directory holding the record stores
    #[arg(short, long)]
    store_dir: Option<PathBuf>,
}

#[derive(Args)]
struct StatsArgs {
    /// Directory holding the record stores
    #[arg(short, long)]
    store_dir: Option<PathBuf>,
}

pub fn run(args: StoreArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = if let Some(path) = config_path {
        InvexConfig::from_file(Path::new(path))?
    } else {
        InvexConfig::default()
    };

    match args.command {
        StoreCommand::List(list_args) => list_records(list_args, &config),
        StoreCommand::Stats(stats_args) => show_stats(stats_args, &config),
    }
}

fn list_records(args: ListArgs, config: &InvexConfig) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir(args.store_dir.as_deref(), config);
    let stores = Stores::open(&data_dir, config)?;

    let (name, store) = if args.recurring {
        ("recurring", &stores.recurring)
    } else {
        ("primary", &stores.primary)
    };
    let records = store.records();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!(
            "{} No records in the {} store ({})",
            style("ℹ").blue(),
            name,
            store.path().display()
        );
        return Ok(());
    }

    println!(
        "{} {} records in the {} store ({})",
        style("ℹ").blue(),
        records.len(),
        name,
        store.path().display()
    );
    println!();

    for record in &records {
        print_record(record);
    }

    Ok(())
}

fn print_record(record: &InvoiceRecord) {
    println!(
        "  {} {} from {}",
        style(&record.message_id).cyan(),
        record.invoice_number,
        record.sender
    );
    println!(
        "      amount €{}  due {}  {}",
        record.amount, record.due_date, record.payment_status
    );
}

fn show_stats(args: StatsArgs, config: &InvexConfig) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir(args.store_dir.as_deref(), config);
    let stores = Stores::open(&data_dir, config)?;

    let primary = stores.primary.records();
    let recurring = stores.recurring.records();

    let paid = primary
        .iter()
        .filter(|r| r.payment_status == PaymentStatus::Paid)
        .count();
    let without_number = primary
        .iter()
        .filter(|r| !r.invoice_number.is_known())
        .count();
    let senders: HashSet<&str> = primary.iter().map(|r| r.sender.as_str()).collect();

    println!("Store directory: {}", data_dir.display());
    println!();
    println!("Primary store:     {} records", primary.len());
    println!("  Paid:            {}", paid);
    println!("  Unpaid:          {}", primary.len() - paid);
    println!("  Without number:  {}", without_number);
    println!("  Distinct senders: {}", senders.len());
    println!();
    println!("Recurring store:   {} records", recurring.len());

    Ok(())
}
