//! Heuristic scoring of (transaction, attachment) pairs
//!
//! Three independent criteria are added up:
//!
//! | Criterion    | Points | Condition                                        |
//! |--------------|--------|--------------------------------------------------|
//! | Amount       | 3      | absolute amounts numerically equal               |
//! | Counterparty | 2      | either name contains the other, ignoring case    |
//! | Date         | 1      | dates at most 7 days apart (inclusive)           |
//!
//! A criterion whose inputs are missing or malformed contributes nothing.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{MatchConfig, CONFIDENCE_THRESHOLD};
use crate::matching::extract::*;
use crate::matching::normalize::parse_date_with;
use crate::types::*;

/// Why a criterion could not be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// A date string was present but did not parse
    MalformedDate,
    /// The field was absent or empty
    MissingField,
}

/// Result of evaluating a single criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum CriterionOutcome {
    Matched,
    Mismatched,
    Unavailable(Degradation),
}

impl CriterionOutcome {
    fn from_bool(matched: bool) -> Self {
        if matched {
            CriterionOutcome::Matched
        } else {
            CriterionOutcome::Mismatched
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, CriterionOutcome::Matched)
    }
}

/// Per-criterion view of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub amount: CriterionOutcome,
    pub counterparty: CriterionOutcome,
    pub date: CriterionOutcome,
    /// Sum of the weights of matched criteria
    pub total: u8,
}

/// Compare two amounts ignoring sign; trailing zeros do not matter but any
/// other difference, however small, does
pub fn amounts_match(left: &BigDecimal, right: &BigDecimal) -> bool {
    left.abs().normalized() == right.abs().normalized()
}

/// Case-insensitive substring check in both directions; empty never matches
pub fn names_match(left: &str, right: &str) -> bool {
    let left = left.trim().to_lowercase();
    let right = right.trim().to_lowercase();

    if left.is_empty() || right.is_empty() {
        return false;
    }

    left.contains(&right) || right.contains(&left)
}

/// True when the dates are at most `window_days` apart
pub fn dates_within(left: NaiveDate, right: NaiveDate, window_days: i64) -> bool {
    (left - right).num_days().abs() <= window_days
}

/// Scores pairs according to a [`MatchConfig`]
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'c> {
    config: &'c MatchConfig,
}

impl Default for Scorer<'static> {
    fn default() -> Self {
        Self::new(MatchConfig::shared_default())
    }
}

impl<'c> Scorer<'c> {
    pub fn new(config: &'c MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'c MatchConfig {
        self.config
    }

    /// Evaluate every criterion for a pair
    pub fn breakdown(&self, transaction: &Transaction, attachment: &Attachment) -> ScoreBreakdown {
        let amount = self.amount_outcome(transaction, attachment);
        let counterparty = self.counterparty_outcome(transaction, attachment);
        let date = self.date_outcome(transaction, attachment);

        let weighted = [
            (amount, self.config.amount_weight),
            (counterparty, self.config.counterparty_weight),
            (date, self.config.date_weight),
        ];
        let total = weighted
            .iter()
            .filter(|(outcome, _)| outcome.is_matched())
            .fold(0u8, |sum, (_, weight)| sum.saturating_add(*weight));

        ScoreBreakdown {
            amount,
            counterparty,
            date,
            total,
        }
    }

    /// Total heuristic score for a pair
    pub fn score(&self, transaction: &Transaction, attachment: &Attachment) -> u8 {
        let breakdown = self.breakdown(transaction, attachment);
        tracing::trace!(
            transaction_id = %transaction.id,
            attachment_id = %attachment.id,
            score = breakdown.total,
            ?breakdown,
            "scored pair"
        );
        breakdown.total
    }

    /// Whether a score clears the configured confidence threshold
    pub fn is_confident(&self, score: u8) -> bool {
        score >= self.config.confidence_threshold
    }

    fn amount_outcome(&self, transaction: &Transaction, attachment: &Attachment) -> CriterionOutcome {
        if !amount_in_range(&transaction.amount) {
            return CriterionOutcome::Unavailable(Degradation::MissingField);
        }
        match get_attachment_amount_with(attachment, self.config) {
            Some(amount) => CriterionOutcome::from_bool(amounts_match(&transaction.amount, &amount)),
            None => CriterionOutcome::Unavailable(Degradation::MissingField),
        }
    }

    fn counterparty_outcome(
        &self,
        transaction: &Transaction,
        attachment: &Attachment,
    ) -> CriterionOutcome {
        let contact = transaction.contact.as_deref().unwrap_or("");
        let party = get_counterparty_with(attachment, self.config);

        if contact.trim().is_empty() || party.is_empty() {
            return CriterionOutcome::Unavailable(Degradation::MissingField);
        }

        CriterionOutcome::from_bool(names_match(contact, party))
    }

    fn date_outcome(&self, transaction: &Transaction, attachment: &Attachment) -> CriterionOutcome {
        let transaction_date = match transaction.date.as_deref().map(str::trim) {
            None | Some("") => return CriterionOutcome::Unavailable(Degradation::MissingField),
            Some(raw) => match parse_date_with(raw, &self.config.date_formats) {
                Some(date) => date,
                None => return CriterionOutcome::Unavailable(Degradation::MalformedDate),
            },
        };

        match get_attachment_date(attachment, self.config) {
            Some(attachment_date) => CriterionOutcome::from_bool(dates_within(
                transaction_date,
                attachment_date,
                self.config.date_window_days,
            )),
            None if self.has_attachment_date_text(attachment) => {
                CriterionOutcome::Unavailable(Degradation::MalformedDate)
            }
            None => CriterionOutcome::Unavailable(Degradation::MissingField),
        }
    }

    fn has_attachment_date_text(&self, attachment: &Attachment) -> bool {
        self.config
            .due_date_fields
            .iter()
            .chain(self.config.invoice_date_fields.iter())
            .any(|field| attachment.text_field(field).is_some())
    }
}

/// Heuristic score of a pair under the default weights (0..=6)
pub fn compute_match_score(transaction: &Transaction, attachment: &Attachment) -> u8 {
    Scorer::default().score(transaction, attachment)
}

/// Whether a score clears the default confidence threshold
pub fn is_confident(score: u8) -> bool {
    score >= CONFIDENCE_THRESHOLD
}
