//! Tunable parameters of the matching heuristics

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

use crate::types::*;

/// Points awarded when amounts are equal to the cent
pub const AMOUNT_WEIGHT: u8 = 3;
/// Points awarded when counterparty names contain one another
pub const COUNTERPARTY_WEIGHT: u8 = 2;
/// Points awarded when dates fall within the window
pub const DATE_WEIGHT: u8 = 1;
/// Maximum day distance (inclusive) for the date criterion
pub const DATE_WINDOW_DAYS: i64 = 7;
/// Minimum heuristic score accepted as a match
pub const CONFIDENCE_THRESHOLD: u8 = 4;

static SHARED_DEFAULT: LazyLock<MatchConfig> = LazyLock::new(MatchConfig::default);

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

/// Matching configuration
///
/// Every field falls back to its default when omitted, so a TOML file only
/// needs to name the values it changes:
///
/// ```toml
/// confidence_threshold = 5
/// counterparty_fields = ["supplier", "issuer"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub amount_weight: u8,
    pub counterparty_weight: u8,
    pub date_weight: u8,
    pub date_window_days: i64,
    pub confidence_threshold: u8,
    /// chrono format strings tried in order when parsing dates
    pub date_formats: Vec<String>,
    /// Attachment fields holding the counterparty name, in priority order
    pub counterparty_fields: Vec<String>,
    /// Attachment fields holding the total amount, in priority order
    pub amount_fields: Vec<String>,
    /// Attachment fields holding the due date, in priority order
    pub due_date_fields: Vec<String>,
    /// Attachment fields holding the invoice date, in priority order
    pub invoice_date_fields: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            amount_weight: AMOUNT_WEIGHT,
            counterparty_weight: COUNTERPARTY_WEIGHT,
            date_weight: DATE_WEIGHT,
            date_window_days: DATE_WINDOW_DAYS,
            confidence_threshold: CONFIDENCE_THRESHOLD,
            date_formats: names(&["%Y-%m-%d"]),
            counterparty_fields: names(&["issuer", "recipient", "supplier"]),
            amount_fields: names(&["total_amount", "amount", "total"]),
            due_date_fields: names(&["due_date"]),
            invoice_date_fields: names(&["invoicing_date", "invoice_date"]),
        }
    }
}

impl MatchConfig {
    /// Process-wide default configuration
    pub fn shared_default() -> &'static MatchConfig {
        &SHARED_DEFAULT
    }

    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> ReconResult<Self> {
        let config: MatchConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a TOML file and validate it
    pub fn from_toml_file(path: impl AsRef<Path>) -> ReconResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Highest score the heuristics can produce
    pub fn max_score(&self) -> u8 {
        self.amount_weight
            .saturating_add(self.counterparty_weight)
            .saturating_add(self.date_weight)
    }

    /// Check that the configuration can ever accept a heuristic match
    pub fn validate(&self) -> ReconResult<()> {
        if self.confidence_threshold == 0 {
            return Err(ReconError::Config(
                "Confidence threshold must be at least 1".to_string(),
            ));
        }

        if self.confidence_threshold > self.max_score() {
            return Err(ReconError::Config(format!(
                "Confidence threshold {} exceeds the maximum attainable score {}",
                self.confidence_threshold,
                self.max_score()
            )));
        }

        if self.date_window_days < 0 {
            return Err(ReconError::Config(
                "Date window cannot be negative".to_string(),
            ));
        }

        let lists = [
            ("date_formats", &self.date_formats),
            ("counterparty_fields", &self.counterparty_fields),
            ("amount_fields", &self.amount_fields),
        ];
        for (name, list) in lists {
            if list.is_empty() {
                return Err(ReconError::Config(format!("{name} cannot be empty")));
            }
        }

        if self.due_date_fields.is_empty() && self.invoice_date_fields.is_empty() {
            return Err(ReconError::Config(
                "At least one attachment date field is required".to_string(),
            ));
        }

        Ok(())
    }
}
