//! Per-run bookkeeping of consumed records

use std::collections::HashSet;

use crate::types::*;

/// Ids consumed during one reconciliation run
///
/// Both sets only grow. A fresh state is created for every run, so two
/// runs never share bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    used_transaction_ids: HashSet<RecordId>,
    used_attachment_ids: HashSet<RecordId>,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn used_transaction_ids(&self) -> &HashSet<RecordId> {
        &self.used_transaction_ids
    }

    pub fn used_attachment_ids(&self) -> &HashSet<RecordId> {
        &self.used_attachment_ids
    }

    pub fn is_transaction_used(&self, transaction_id: &str) -> bool {
        self.used_transaction_ids.contains(transaction_id)
    }

    pub fn is_attachment_used(&self, attachment_id: &str) -> bool {
        self.used_attachment_ids.contains(attachment_id)
    }

    /// Consume both ids of a pair
    ///
    /// Returns `false` and leaves the state untouched if either id was
    /// already consumed.
    pub fn claim(&mut self, transaction_id: &str, attachment_id: &str) -> bool {
        if self.is_transaction_used(transaction_id) || self.is_attachment_used(attachment_id) {
            return false;
        }

        self.used_transaction_ids.insert(transaction_id.to_string());
        self.used_attachment_ids.insert(attachment_id.to_string());
        true
    }

    /// Number of pairs claimed so far
    pub fn claimed(&self) -> usize {
        self.used_attachment_ids.len()
    }
}
