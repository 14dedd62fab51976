//! Full reconciliation runs over two record collections

use uuid::Uuid;

use crate::config::MatchConfig;
use crate::matching::Matcher;
use crate::reconciliation::MatchState;
use crate::types::*;

/// Runs greedy reconciliation passes with a fixed configuration
///
/// Assignment is greedy in input order, so an early record may take a
/// counterpart that a later record would have scored higher against. The
/// result is deterministic but not a globally optimal pairing.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: MatchConfig,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }
}

impl Reconciler {
    /// Create a reconciler after validating the configuration
    pub fn new(config: MatchConfig) -> ReconResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Transaction-driven run, the canonical direction for reports
    pub fn reconcile(
        &self,
        transactions: &[Transaction],
        attachments: &[Attachment],
    ) -> ReconciliationReport {
        let run_id = Uuid::new_v4();
        let direction = MatchDirection::TransactionDriven;
        let _span = tracing::info_span!("reconcile", %run_id, %direction).entered();

        let matcher = Matcher::new(&self.config);
        let mut state = MatchState::new();
        let mut matches = Vec::new();
        let mut unmatched_transactions = Vec::new();

        for transaction in transactions {
            if state.is_transaction_used(&transaction.id) {
                tracing::warn!(transaction_id = %transaction.id, "duplicate transaction id skipped");
                continue;
            }

            let selection =
                matcher.select_attachment(transaction, attachments, state.used_attachment_ids());
            match selection {
                Some(selection) if state.claim(&transaction.id, &selection.record.id) => {
                    tracing::debug!(
                        transaction_id = %transaction.id,
                        attachment_id = %selection.record.id,
                        basis = %selection.basis,
                        "matched"
                    );
                    matches.push(MatchResult {
                        transaction_id: transaction.id.clone(),
                        attachment_id: selection.record.id.clone(),
                        basis: selection.basis,
                    });
                }
                _ => unmatched_transactions.push(transaction.id.clone()),
            }
        }

        let unmatched_attachments = unclaimed(attachments, |id| state.is_attachment_used(id));
        finish(
            run_id,
            direction,
            &state,
            matches,
            unmatched_transactions,
            unmatched_attachments,
        )
    }

    /// Attachment-driven run, mirroring [`Reconciler::reconcile`]
    ///
    /// May pair records differently from the transaction-driven run when
    /// scores tie or consumption order matters.
    pub fn reconcile_by_attachment(
        &self,
        transactions: &[Transaction],
        attachments: &[Attachment],
    ) -> ReconciliationReport {
        let run_id = Uuid::new_v4();
        let direction = MatchDirection::AttachmentDriven;
        let _span = tracing::info_span!("reconcile", %run_id, %direction).entered();

        let matcher = Matcher::new(&self.config);
        let mut state = MatchState::new();
        let mut matches = Vec::new();
        let mut unmatched_attachments = Vec::new();

        for attachment in attachments {
            if state.is_attachment_used(&attachment.id) {
                tracing::warn!(attachment_id = %attachment.id, "duplicate attachment id skipped");
                continue;
            }

            let selection =
                matcher.select_transaction(attachment, transactions, state.used_transaction_ids());
            match selection {
                Some(selection) if state.claim(&selection.record.id, &attachment.id) => {
                    tracing::debug!(
                        transaction_id = %selection.record.id,
                        attachment_id = %attachment.id,
                        basis = %selection.basis,
                        "matched"
                    );
                    matches.push(MatchResult {
                        transaction_id: selection.record.id.clone(),
                        attachment_id: attachment.id.clone(),
                        basis: selection.basis,
                    });
                }
                _ => unmatched_attachments.push(attachment.id.clone()),
            }
        }

        let unmatched_transactions = unclaimed(transactions, |id| state.is_transaction_used(id));
        finish(
            run_id,
            direction,
            &state,
            matches,
            unmatched_transactions,
            unmatched_attachments,
        )
    }
}

/// Ids of records never claimed, in input order and without repeats
fn unclaimed<T: crate::traits::Matchable>(
    records: &[T],
    is_used: impl Fn(&str) -> bool,
) -> Vec<RecordId> {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .map(|record| record.record_id())
        .filter(|id| !is_used(*id) && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

fn finish(
    run_id: Uuid,
    direction: MatchDirection,
    state: &MatchState,
    matches: Vec<MatchResult>,
    unmatched_transactions: Vec<RecordId>,
    unmatched_attachments: Vec<RecordId>,
) -> ReconciliationReport {
    let report = ReconciliationReport {
        run_id,
        direction,
        matches,
        unmatched_transactions,
        unmatched_attachments,
    };

    tracing::info!(
        matched = state.claimed(),
        exact = report.exact_matches().count(),
        unmatched_transactions = report.unmatched_transactions.len(),
        unmatched_attachments = report.unmatched_attachments.len(),
        "reconciliation finished"
    );

    report
}
