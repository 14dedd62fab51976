//! Restricted view of a run for downstream question answering
//!
//! The query layer only ever sees what is in a [`ReconciliationSummary`]:
//! the ids of the report plus a handful of descriptive fields. Records that
//! are not named by the report are never included.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::MatchConfig;
use crate::matching::{get_attachment_amount_with, get_counterparty_with};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPairView {
    pub transaction_id: RecordId,
    pub attachment_id: RecordId,
    pub amount: Option<BigDecimal>,
    pub contact: Option<String>,
    #[serde(flatten)]
    pub basis: MatchBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: RecordId,
    pub amount: Option<BigDecimal>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentView {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<BigDecimal>,
    pub reference: Option<String>,
    pub counterparty: Option<String>,
}

/// Matched and unmatched records of one run, reduced to safe fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub run_id: Uuid,
    pub matched: Vec<MatchedPairView>,
    pub unmatched_transactions: Vec<TransactionView>,
    pub unmatched_attachments: Vec<AttachmentView>,
}

impl ReconciliationSummary {
    /// Build the summary of a report from the collections and configuration
    /// it was run with
    pub fn from_report(
        report: &ReconciliationReport,
        transactions: &[Transaction],
        attachments: &[Attachment],
        config: &MatchConfig,
    ) -> Self {
        let transactions: HashMap<&str, &Transaction> =
            transactions.iter().map(|t| (t.id.as_str(), t)).collect();
        let attachments: HashMap<&str, &Attachment> =
            attachments.iter().map(|a| (a.id.as_str(), a)).collect();

        let matched = report
            .matches
            .iter()
            .map(|m| {
                let transaction = transactions.get(m.transaction_id.as_str());
                MatchedPairView {
                    transaction_id: m.transaction_id.clone(),
                    attachment_id: m.attachment_id.clone(),
                    amount: transaction.map(|t| t.amount.clone()),
                    contact: transaction.and_then(|t| t.contact.clone()),
                    basis: m.basis,
                }
            })
            .collect();

        let unmatched_transactions = report
            .unmatched_transactions
            .iter()
            .map(|id| {
                let transaction = transactions.get(id.as_str());
                TransactionView {
                    id: id.clone(),
                    amount: transaction.map(|t| t.amount.clone()),
                    contact: transaction.and_then(|t| t.contact.clone()),
                }
            })
            .collect();

        let unmatched_attachments = report
            .unmatched_attachments
            .iter()
            .map(|id| match attachments.get(id.as_str()) {
                Some(attachment) => AttachmentView {
                    id: id.clone(),
                    kind: attachment.kind.clone(),
                    amount: get_attachment_amount_with(attachment, config),
                    reference: attachment.reference().map(|r| r.into_owned()),
                    counterparty: Some(get_counterparty_with(attachment, config))
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                },
                None => AttachmentView {
                    id: id.clone(),
                    kind: None,
                    amount: None,
                    reference: None,
                    counterparty: None,
                },
            })
            .collect();

        Self {
            run_id: report.run_id,
            matched,
            unmatched_transactions,
            unmatched_attachments,
        }
    }

    /// Pretty-printed JSON for handing to the query layer
    pub fn to_json_pretty(&self) -> ReconResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
