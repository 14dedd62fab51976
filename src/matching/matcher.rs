//! Two-phase selection of a counterpart record
//!
//! The exact phase pairs records whose normalized references are equal and
//! non-empty; the first unused candidate in input order wins and scoring is
//! skipped. Only when no reference matches does the heuristic phase score
//! every unused candidate and keep the strictly highest score, first seen
//! on ties, provided it reaches the confidence threshold.
//!
//! The matcher owns no run state. Callers pass the ids already consumed and
//! record the selection themselves (see [`crate::reconciliation::MatchState`]).

use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::matching::scoring::Scorer;
use crate::traits::Matchable;
use crate::types::*;

/// A chosen candidate together with how it was chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a, T> {
    pub record: &'a T,
    pub basis: MatchBasis,
}

/// Finds counterparts for transactions and attachments
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'c> {
    scorer: Scorer<'c>,
}

impl Default for Matcher<'static> {
    fn default() -> Self {
        Self {
            scorer: Scorer::default(),
        }
    }
}

impl<'c> Matcher<'c> {
    pub fn new(config: &'c MatchConfig) -> Self {
        Self {
            scorer: Scorer::new(config),
        }
    }

    pub fn scorer(&self) -> &Scorer<'c> {
        &self.scorer
    }

    /// Best unused attachment for a transaction
    pub fn select_attachment<'a>(
        &self,
        transaction: &Transaction,
        attachments: &'a [Attachment],
        used_attachment_ids: &HashSet<RecordId>,
    ) -> Option<Selection<'a, Attachment>> {
        self.select(transaction, attachments, used_attachment_ids, |attachment| {
            self.scorer.score(transaction, attachment)
        })
    }

    /// Best unused transaction for an attachment
    pub fn select_transaction<'a>(
        &self,
        attachment: &Attachment,
        transactions: &'a [Transaction],
        used_transaction_ids: &HashSet<RecordId>,
    ) -> Option<Selection<'a, Transaction>> {
        self.select(attachment, transactions, used_transaction_ids, |transaction| {
            self.scorer.score(transaction, attachment)
        })
    }

    fn select<'a, S, T, F>(
        &self,
        subject: &S,
        candidates: &'a [T],
        used_ids: &HashSet<RecordId>,
        score: F,
    ) -> Option<Selection<'a, T>>
    where
        S: Matchable,
        T: Matchable,
        F: Fn(&T) -> u8,
    {
        let available = move || {
            candidates
                .iter()
                .filter(move |candidate| !used_ids.contains(candidate.record_id()))
        };

        let reference = subject.normalized_reference();
        if !reference.is_empty() {
            if let Some(record) =
                available().find(|candidate| candidate.normalized_reference() == reference)
            {
                return Some(Selection {
                    record,
                    basis: MatchBasis::Exact,
                });
            }
        }

        let mut best: Option<(u8, &'a T)> = None;
        for candidate in available() {
            let candidate_score = score(candidate);
            if best.is_none_or(|(best_score, _)| candidate_score > best_score) {
                best = Some((candidate_score, candidate));
            }
        }

        match best {
            Some((best_score, record)) if self.scorer.is_confident(best_score) => Some(Selection {
                record,
                basis: MatchBasis::Heuristic { score: best_score },
            }),
            Some((best_score, _)) => {
                tracing::trace!(
                    subject_id = subject.record_id(),
                    best_score,
                    "best candidate below confidence threshold"
                );
                None
            }
            None => None,
        }
    }
}

/// Find the attachment matching a transaction with the default configuration
pub fn find_attachment<'a>(
    transaction: &Transaction,
    attachments: &'a [Attachment],
    used_attachment_ids: &HashSet<RecordId>,
) -> Option<&'a Attachment> {
    Matcher::default()
        .select_attachment(transaction, attachments, used_attachment_ids)
        .map(|selection| selection.record)
}

/// Find the transaction matching an attachment with the default configuration
pub fn find_transaction<'a>(
    attachment: &Attachment,
    transactions: &'a [Transaction],
    used_transaction_ids: &HashSet<RecordId>,
) -> Option<&'a Transaction> {
    Matcher::default()
        .select_transaction(attachment, transactions, used_transaction_ids)
        .map(|selection| selection.record)
}
