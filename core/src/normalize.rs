//! Normalization of store rows into canonical `RsvpEntry` values.
//!
//! The store script has written headers with different casing and names
//! across revisions, and returns either a bare array or `{ "rows": [...] }`.
//! Decoding tries the canonical shape first and falls back to a per-field
//! alias lookup, so nothing past this module sees the difference.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::RsvpEntry;

const NAME_KEYS: &[&str] = &["name", "Name", "full_name", "fullName"];
const EMAIL_KEYS: &[&str] = &["email", "Email", "email_address", "e-mail"];
const ATTENDING_KEYS: &[&str] = &["attending", "Attending", "rsvp", "response"];
const GUESTS_KEYS: &[&str] = &["guests", "Guests", "guest_count", "party_size"];
const MESSAGE_KEYS: &[&str] = &["message", "Message", "note", "notes"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "Timestamp", "submitted_at", "date"];

/// Shapes the list endpoint has been seen to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload {
    Rows(Vec<Value>),
    Wrapped { rows: Vec<Value> },
    Other(Value),
}

impl ListPayload {
    /// The row values, or nothing when the payload is neither known shape
    /// (for example a `{ "error": "..." }` object).
    pub fn into_rows(self) -> Vec<Value> {
        match self {
            ListPayload::Rows(rows) | ListPayload::Wrapped { rows } => rows,
            ListPayload::Other(_) => Vec::new(),
        }
    }
}

/// Normalize every object row and drop blank ones. Non-object array items
/// are skipped.
pub fn normalize_rows(rows: Vec<Value>) -> Vec<RsvpEntry> {
    rows.iter()
        .filter_map(normalize_row)
        .filter(|entry| !entry.is_blank())
        .collect()
}

/// Decode one row: canonical shape first, legacy alias lookup otherwise.
/// `None` for anything but an object.
pub fn normalize_row(row: &Value) -> Option<RsvpEntry> {
    let map = row.as_object()?;
    Some(RsvpEntry::deserialize(row).unwrap_or_else(|_| normalize_legacy_row(map)))
}

fn normalize_legacy_row(row: &Map<String, Value>) -> RsvpEntry {
    RsvpEntry {
        name: lookup(row, NAME_KEYS).map(stringify).unwrap_or_default(),
        email: lookup(row, EMAIL_KEYS).map(stringify).unwrap_or_default(),
        attending: lookup(row, ATTENDING_KEYS).map(stringify).unwrap_or_default(),
        guests: lookup(row, GUESTS_KEYS).map(parse_guests).unwrap_or(0),
        message: lookup(row, MESSAGE_KEYS).map(stringify).unwrap_or_default(),
        timestamp: lookup(row, TIMESTAMP_KEYS).map(stringify).unwrap_or_default(),
    }
}

/// First non-empty value along the alias chain. For each alias the exact
/// key is tried before case-insensitive (and whitespace-trimmed) matches.
fn lookup<'a>(row: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .flat_map(|alias| {
            let loose = row
                .iter()
                .filter(move |(key, _)| key.trim().eq_ignore_ascii_case(alias))
                .map(|(_, value)| value);
            row.get(*alias).into_iter().chain(loose)
        })
        .find(|value| is_present(value))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Best-effort base-10 guest count. Negative, fractional-only or garbage
/// input yields 0; fractions are truncated.
pub fn parse_guests(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).unwrap_or(u32::MAX)
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f > 0.0 {
                    f.trunc() as u32
                } else {
                    0
                }
            } else {
                0
            }
        }
        Value::String(s) => parse_leading_int(s),
        _ => 0,
    }
}

/// Parse the leading integer of `s` the way a lenient form parser does:
/// `" 2 adults"` is 2, `"-1"` and `"two"` are 0.
fn parse_leading_int(s: &str) -> u32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if negative {
        return 0;
    }
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(u32::from(d - b'0')))
}
