//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a transaction or attachment
pub type RecordId = String;

/// Auxiliary fields of a record, looked up by name during extraction
pub type FieldMap = BTreeMap<String, serde_json::Value>;

/// Largest number of significant digits accepted in an amount
pub const MAX_AMOUNT_DIGITS: u64 = 38;

/// Largest decimal exponent (in either direction) accepted in an amount
pub const MAX_AMOUNT_EXPONENT: i64 = 64;

/// Parse an amount, refusing values whose digit count or exponent would make
/// arithmetic on them unbounded (e.g. `1e999999999`)
pub fn parse_amount(text: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(text.trim())
        .ok()
        .filter(amount_in_range)
}

/// Whether an amount lies within the digit and exponent bounds
pub fn amount_in_range(amount: &BigDecimal) -> bool {
    let (_, scale) = amount.as_bigint_and_exponent();
    scale.abs() <= MAX_AMOUNT_EXPONENT && amount.digits() <= MAX_AMOUNT_DIGITS
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawText> for String {
    fn from(raw: RawText) -> Self {
        match raw {
            RawText::Text(text) => text,
            RawText::Signed(number) => number.to_string(),
            RawText::Unsigned(number) => number.to_string(),
        }
    }
}

/// Accept ids written either as JSON strings or as integers
fn deserialize_record_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    RawText::deserialize(deserializer).map(String::from)
}

/// Accept an optional reference written either as a JSON string or as an integer
fn deserialize_optional_reference<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawText>::deserialize(deserializer)?.map(String::from))
}

/// Accept amounts written as JSON numbers or decimal strings.
///
/// Numbers are read from their shortest decimal form, so `89.9` becomes
/// exactly `89.9` rather than the nearest binary float.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
    }

    let text = match RawAmount::deserialize(deserializer)? {
        RawAmount::Text(text) => text,
        RawAmount::Signed(number) => number.to_string(),
        RawAmount::Unsigned(number) => number.to_string(),
        RawAmount::Float(number) => number.to_string(),
    };
    parse_amount(&text).ok_or_else(|| D::Error::custom(format!("invalid amount: {text}")))
}

/// A bank transaction as loaded from the statement feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: RecordId,
    /// Signed amount; outgoing payments are usually negative
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: BigDecimal,
    /// Name of the payer or payee
    #[serde(default)]
    pub contact: Option<String>,
    /// Posting date, kept raw so malformed values degrade at scoring time
    #[serde(default)]
    pub date: Option<String>,
    /// Optional payment reference
    #[serde(default, deserialize_with = "deserialize_optional_reference")]
    pub reference: Option<String>,
    /// Any other fields present in the input
    #[serde(flatten)]
    pub extra: FieldMap,
}

impl Transaction {
    /// Create a new transaction with only the required fields set
    pub fn new(id: impl Into<RecordId>, amount: BigDecimal) -> Self {
        Self {
            id: id.into(),
            amount,
            contact: None,
            date: None,
            reference: None,
            extra: FieldMap::new(),
        }
    }

    /// Set the counterparty name
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Set the raw posting date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the payment reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// A supporting document (invoice or receipt)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier for the attachment
    #[serde(deserialize_with = "deserialize_record_id")]
    pub id: RecordId,
    /// Document type, e.g. "invoice" or "receipt"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Extracted document fields (amount, parties, dates, reference)
    #[serde(default)]
    pub data: FieldMap,
}

impl Attachment {
    /// Create a new attachment without any extracted fields
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            kind: None,
            data: FieldMap::new(),
        }
    }

    /// Set the document type
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set an extracted field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    /// Look up a non-empty string field
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.data
            .get(name)
            .and_then(|value| value.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    /// Raw payment reference printed on the document; numeric references
    /// are rendered as their decimal text
    pub fn reference(&self) -> Option<Cow<'_, str>> {
        match self.data.get("reference")? {
            serde_json::Value::Number(number) => Some(Cow::Owned(number.to_string())),
            _ => self.text_field("reference").map(Cow::Borrowed),
        }
    }
}

/// How a match was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchBasis {
    /// Normalized references were identical; scoring was bypassed
    Exact,
    /// Best heuristic score at or above the confidence threshold
    Heuristic { score: u8 },
}

impl MatchBasis {
    /// Heuristic score, if the match was not an exact-reference match
    pub fn score(&self) -> Option<u8> {
        match self {
            MatchBasis::Exact => None,
            MatchBasis::Heuristic { score } => Some(*score),
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, MatchBasis::Exact)
    }
}

impl fmt::Display for MatchBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchBasis::Exact => write!(f, "exact"),
            MatchBasis::Heuristic { score } => write!(f, "heuristic ({score})"),
        }
    }
}

/// One transaction paired with one attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub transaction_id: RecordId,
    pub attachment_id: RecordId,
    pub basis: MatchBasis,
}

/// Which side drives a greedy reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchDirection {
    /// Each transaction looks for an attachment (canonical)
    TransactionDriven,
    /// Each attachment looks for a transaction
    AttachmentDriven,
}

impl fmt::Display for MatchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchDirection::TransactionDriven => write!(f, "transaction_driven"),
            MatchDirection::AttachmentDriven => write!(f, "attachment_driven"),
        }
    }
}

/// Outcome of a single reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Identifier of the run that produced this report
    pub run_id: Uuid,
    /// Side that drove the greedy assignment
    pub direction: MatchDirection,
    /// Accepted pairs in the order they were decided
    pub matches: Vec<MatchResult>,
    /// Transactions left without an attachment, in input order
    pub unmatched_transactions: Vec<RecordId>,
    /// Attachments left without a transaction, in input order
    pub unmatched_attachments: Vec<RecordId>,
}

impl ReconciliationReport {
    /// Matches decided by reference equality
    pub fn exact_matches(&self) -> impl Iterator<Item = &MatchResult> {
        self.matches.iter().filter(|m| m.basis.is_exact())
    }

    /// Matches decided by heuristic score
    pub fn heuristic_matches(&self) -> impl Iterator<Item = &MatchResult> {
        self.matches.iter().filter(|m| !m.basis.is_exact())
    }

    /// Attachment paired with the given transaction, if any
    pub fn attachment_for(&self, transaction_id: &str) -> Option<&RecordId> {
        self.matches
            .iter()
            .find(|m| m.transaction_id == transaction_id)
            .map(|m| &m.attachment_id)
    }

    /// Transaction paired with the given attachment, if any
    pub fn transaction_for(&self, attachment_id: &str) -> Option<&RecordId> {
        self.matches
            .iter()
            .find(|m| m.attachment_id == attachment_id)
            .map(|m| &m.transaction_id)
    }

    /// True when nothing was left over on either side
    pub fn is_fully_reconciled(&self) -> bool {
        self.unmatched_transactions.is_empty() && self.unmatched_attachments.is_empty()
    }
}

/// Errors raised while loading records or configuration.
///
/// Nothing inside a matching pass produces these; missing or malformed
/// fields only lower the score.
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: RecordId },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
