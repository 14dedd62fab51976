//! Reference and date normalization

use chrono::{DateTime, NaiveDate};

/// Canonicalize a payment reference for equality comparison
///
/// Whitespace is removed, then any leading `RF` prefix (any case) and
/// leading zeros are stripped until neither remains, which makes the
/// function idempotent. An empty result is never a valid match target.
pub fn normalize_reference(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let mut rest = compact.as_str();
    loop {
        if rest.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("rf")) {
            rest = &rest[2..];
        } else if let Some(stripped) = rest.strip_prefix('0') {
            rest = stripped;
        } else {
            break;
        }
    }

    rest.to_string()
}

/// Compare two references after normalization; empty never matches
pub fn references_match(left: &str, right: &str) -> bool {
    let left = normalize_reference(left);
    !left.is_empty() && left == normalize_reference(right)
}

/// Parse a date with the default `YYYY-MM-DD` format
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_date_with(raw, &["%Y-%m-%d"])
}

/// Parse a date trying each chrono format in order, then RFC 3339
///
/// Returns `None` for blank or unparsable input; callers treat that as
/// "date comparison unavailable".
pub fn parse_date_with<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format.as_ref()).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}
