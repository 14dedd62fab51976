//! Loading record collections from JSON

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_unique_ids;

fn parse_records<T: DeserializeOwned>(json: &str) -> ReconResult<Vec<T>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse and validate a JSON array of transactions
pub fn load_transactions_str(
    json: &str,
    validator: &dyn RecordValidator,
) -> ReconResult<Vec<Transaction>> {
    let transactions: Vec<Transaction> = parse_records(json)?;
    for transaction in &transactions {
        validator.validate_transaction(transaction)?;
    }
    validate_unique_ids("transaction", &transactions)?;

    tracing::debug!(count = transactions.len(), "loaded transactions");
    Ok(transactions)
}

/// Parse and validate a JSON array of attachments
pub fn load_attachments_str(
    json: &str,
    validator: &dyn RecordValidator,
) -> ReconResult<Vec<Attachment>> {
    let attachments: Vec<Attachment> = parse_records(json)?;
    for attachment in &attachments {
        validator.validate_attachment(attachment)?;
    }
    validate_unique_ids("attachment", &attachments)?;

    tracing::debug!(count = attachments.len(), "loaded attachments");
    Ok(attachments)
}

/// Read transactions from a JSON file
pub fn load_transactions_file(
    path: impl AsRef<Path>,
    validator: &dyn RecordValidator,
) -> ReconResult<Vec<Transaction>> {
    let json = std::fs::read_to_string(path)?;
    load_transactions_str(&json, validator)
}

/// Read attachments from a JSON file
pub fn load_attachments_file(
    path: impl AsRef<Path>,
    validator: &dyn RecordValidator,
) -> ReconResult<Vec<Attachment>> {
    let json = std::fs::read_to_string(path)?;
    load_attachments_str(&json, validator)
}
