//! Validation utilities

use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::matching::{get_attachment_amount_with, parse_date_with};
use crate::traits::*;
use crate::types::*;

/// Validate that a record id is usable
pub fn validate_record_id(kind: &str, id: &str) -> ReconResult<()> {
    if id.trim().is_empty() {
        return Err(ReconError::InvalidRecord(format!("{kind} ID cannot be empty")));
    }

    if id.trim() != id {
        return Err(ReconError::InvalidRecord(format!(
            "{kind} ID '{id}' has leading or trailing whitespace"
        )));
    }

    Ok(())
}

/// Validate that no id occurs twice in a collection
pub fn validate_unique_ids<T: Matchable>(kind: &'static str, records: &[T]) -> ReconResult<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.record_id()) {
            return Err(ReconError::DuplicateId {
                kind,
                id: record.record_id().to_string(),
            });
        }
    }
    Ok(())
}

/// Validator that rejects records which would only ever score partially
///
/// Use it when incomplete records should be fixed at the source instead of
/// degrading silently during matching.
pub struct StrictRecordValidator {
    config: MatchConfig,
}

impl StrictRecordValidator {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }
}

impl Default for StrictRecordValidator {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl RecordValidator for StrictRecordValidator {
    fn validate_transaction(&self, transaction: &Transaction) -> ReconResult<()> {
        validate_record_id("Transaction", &transaction.id)?;

        let date = transaction.date.as_deref().unwrap_or("");
        if parse_date_with(date, &self.config.date_formats).is_none() {
            return Err(ReconError::InvalidRecord(format!(
                "Transaction '{}' has a missing or malformed date '{}'",
                transaction.id, date
            )));
        }

        Ok(())
    }

    fn validate_attachment(&self, attachment: &Attachment) -> ReconResult<()> {
        validate_record_id("Attachment", &attachment.id)?;

        if get_attachment_amount_with(attachment, &self.config).is_none() {
            return Err(ReconError::InvalidRecord(format!(
                "Attachment '{}' has no total amount",
                attachment.id
            )));
        }

        Ok(())
    }
}
