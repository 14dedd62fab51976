//! Traits shared by both sides of a match and for load-time validation

use std::borrow::Cow;

use crate::matching::normalize_reference;
use crate::types::*;

/// A record that can take part in a match
///
/// Implemented by both [`Transaction`] and [`Attachment`] so the exact and
/// heuristic phases are written once for either direction.
pub trait Matchable {
    /// Unique identifier within its collection
    fn record_id(&self) -> &str;

    /// Payment reference as it appears in the input
    fn raw_reference(&self) -> Option<Cow<'_, str>>;

    /// Canonical reference; empty when there is nothing to compare
    fn normalized_reference(&self) -> String {
        self.raw_reference()
            .map(|raw| normalize_reference(&raw))
            .unwrap_or_default()
    }
}

impl Matchable for Transaction {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn raw_reference(&self) -> Option<Cow<'_, str>> {
        self.reference.as_deref().map(Cow::Borrowed)
    }
}

impl Matchable for Attachment {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn raw_reference(&self) -> Option<Cow<'_, str>> {
        self.reference()
    }
}

/// Trait for implementing custom record validation rules
///
/// Validation runs when collections are loaded. A record that passes may
/// still have missing or malformed fields; those only lower its score.
pub trait RecordValidator: Send + Sync {
    /// Validate a transaction before it enters a run
    fn validate_transaction(&self, transaction: &Transaction) -> ReconResult<()>;

    /// Validate an attachment before it enters a run
    fn validate_attachment(&self, attachment: &Attachment) -> ReconResult<()>;
}

/// Default record validator: only the id is required
pub struct DefaultRecordValidator;

impl RecordValidator for DefaultRecordValidator {
    fn validate_transaction(&self, transaction: &Transaction) -> ReconResult<()> {
        if transaction.id.trim().is_empty() {
            return Err(ReconError::InvalidRecord(
                "Transaction ID cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_attachment(&self, attachment: &Attachment) -> ReconResult<()> {
        if attachment.id.trim().is_empty() {
            return Err(ReconError::InvalidRecord(
                "Attachment ID cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
