//! Reconcile the sample statement against the sample documents
//!
//! Run with `cargo run --example reconcile [transactions.json attachments.json [match.toml]]`.
//! Set `RUST_LOG=reconciliation_core=debug` to see individual match decisions.

use reconciliation_core::utils::{load_attachments_file, load_transactions_file};
use reconciliation_core::{
    DefaultRecordValidator, MatchConfig, ReconciliationSummary, Reconciler,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/data");
    let mut args = std::env::args().skip(1);
    let transactions_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("transactions.json"));
    let attachments_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("attachments.json"));
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("match.toml"));

    println!("🧾 Reconciliation Core - Statement Reconciliation Example\n");

    let validator = DefaultRecordValidator;
    let transactions = load_transactions_file(&transactions_path, &validator)?;
    let attachments = load_attachments_file(&attachments_path, &validator)?;
    let config = MatchConfig::from_toml_file(&config_path)?;
    println!(
        "📥 Loaded {} transactions and {} attachments\n",
        transactions.len(),
        attachments.len()
    );

    let reconciler = Reconciler::new(config)?;
    let report = reconciler.reconcile(&transactions, &attachments);

    println!("=== Matched Transactions ===");
    for m in &report.matches {
        println!(
            "  ✓ Transaction {} ↔ Attachment {} ({})",
            m.transaction_id, m.attachment_id, m.basis
        );
    }

    println!("\n=== Unmatched Transactions ===");
    for id in &report.unmatched_transactions {
        println!("  ✗ Transaction {id}");
    }

    println!("\n=== Unmatched Attachments ===");
    for id in &report.unmatched_attachments {
        println!("  ✗ Attachment {id}");
    }

    let summary =
        ReconciliationSummary::from_report(&report, &transactions, &attachments, reconciler.config());
    println!("\n📋 Summary for the query assistant:\n{}", summary.to_json_pretty()?);

    Ok(())
}
