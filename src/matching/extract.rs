//! Field extraction from heterogeneous attachment records

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::MatchConfig;
use crate::matching::normalize::parse_date_with;
use crate::types::*;

/// Counterparty name of an attachment, using the default field order
pub fn get_counterparty(attachment: &Attachment) -> &str {
    get_counterparty_with(attachment, MatchConfig::shared_default())
}

/// Counterparty name from the first non-empty configured field, or `""`
pub fn get_counterparty_with<'a>(attachment: &'a Attachment, config: &MatchConfig) -> &'a str {
    config
        .counterparty_fields
        .iter()
        .find_map(|field| attachment.text_field(field))
        .unwrap_or("")
}

/// Total amount of an attachment, using the default field order
pub fn get_attachment_amount(attachment: &Attachment) -> Option<BigDecimal> {
    get_attachment_amount_with(attachment, MatchConfig::shared_default())
}

/// Total amount from the first configured field holding a number
///
/// Amounts may be JSON numbers or numeric strings. `None` means no usable
/// amount is present, which includes values outside [`parse_amount`]'s bounds.
pub fn get_attachment_amount_with(attachment: &Attachment, config: &MatchConfig) -> Option<BigDecimal> {
    config
        .amount_fields
        .iter()
        .filter_map(|field| attachment.data.get(field))
        .find_map(decimal_from_value)
}

/// Date of an attachment for proximity scoring
///
/// The due date is preferred; the invoice date is used when no due date
/// field parses.
pub fn get_attachment_date(attachment: &Attachment, config: &MatchConfig) -> Option<NaiveDate> {
    config
        .due_date_fields
        .iter()
        .chain(config.invoice_date_fields.iter())
        .filter_map(|field| attachment.text_field(field))
        .find_map(|raw| parse_date_with(raw, &config.date_formats))
}

fn decimal_from_value(value: &Value) -> Option<BigDecimal> {
    match value {
        // Display of a JSON number is its shortest round-trip form
        Value::Number(number) => parse_amount(&number.to_string()),
        Value::String(text) => parse_amount(text),
        _ => None,
    }
}
