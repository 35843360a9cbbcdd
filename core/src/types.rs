//! Domain DTOs for the RSVP store.
//!
//! # Design
//! `NewEntry` is what the guest form holds; `RsvpEntry` is the canonical
//! record the gateway hands back after normalizing whatever the store
//! returned. The two are kept apart because the store accepts any string for
//! `attending` while the form only offers Yes/No.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column order used by the store and by every export.
pub const FIELD_NAMES: [&str; 6] = ["name", "email", "attending", "guests", "message", "timestamp"];

/// The guest's answer as offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Attendance {
    #[default]
    Yes,
    No,
}

impl Attendance {
    pub fn as_str(self) -> &'static str {
        match self {
            Attendance::Yes => "Yes",
            Attendance::No => "No",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RSVP as entered in the form, before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub name: String,
    pub email: String,
    pub attending: Attendance,
    #[serde(default)]
    pub guests: u32,
    #[serde(default)]
    pub message: String,
    /// Set by the gateway at submission time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl NewEntry {
    pub fn is_valid(&self) -> bool {
        validate_entry(self)
    }
}

/// Admission gate applied before submitting: name and email must both be
/// non-blank. No format checks.
pub fn validate_entry(entry: &NewEntry) -> bool {
    !entry.name.trim().is_empty() && !entry.email.trim().is_empty()
}

/// A canonical RSVP row as read back from the store.
///
/// Deserialization is strict: exactly the six lowercase keys with a numeric
/// `guests`. Rows in any other shape go through `normalize::normalize_row`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RsvpEntry {
    pub name: String,
    pub email: String,
    pub attending: String,
    pub guests: u32,
    pub message: String,
    pub timestamp: String,
}

impl RsvpEntry {
    /// The row as an ordered JSON object keyed by `FIELD_NAMES`.
    pub fn to_row(&self) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("name".to_string(), Value::from(self.name.as_str()));
        row.insert("email".to_string(), Value::from(self.email.as_str()));
        row.insert("attending".to_string(), Value::from(self.attending.as_str()));
        row.insert("guests".to_string(), Value::from(self.guests));
        row.insert("message".to_string(), Value::from(self.message.as_str()));
        row.insert("timestamp".to_string(), Value::from(self.timestamp.as_str()));
        row
    }

    /// Rows with neither a name nor an email (ignoring whitespace) are
    /// stray blank sheet rows.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.email.trim().is_empty()
    }
}

/// Acknowledgement returned by the store for an `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddAck {
    pub ok: bool,
}

/// How an `add` is carried to the store. Both store revisions are in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddEncoding {
    /// `GET ?action=add&name=...` with every field stringified.
    #[default]
    Query,
    /// `POST {"action":"add","entry":{...}}`.
    JsonBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, email: &str) -> NewEntry {
        NewEntry {
            name: name.to_string(),
            email: email.to_string(),
            ..NewEntry::default()
        }
    }

    #[test]
    fn validate_accepts_name_and_email() {
        assert!(validate_entry(&entry("Ana", "a@x.com")));
        // no format validation
        assert!(validate_entry(&entry("Ana", "not-an-email")));
    }

    #[test]
    fn validate_rejects_missing_fields() {
        assert!(!validate_entry(&entry("", "a@x.com")));
        assert!(!validate_entry(&entry("Ana", "")));
        assert!(!validate_entry(&entry("", "")));
        assert!(!validate_entry(&entry("   ", "a@x.com")));
    }

    #[test]
    fn attendance_serializes_as_title_case() {
        assert_eq!(serde_json::to_value(Attendance::Yes).unwrap(), "Yes");
        assert_eq!(serde_json::to_value(Attendance::No).unwrap(), "No");
        assert_eq!(Attendance::default(), Attendance::Yes);
    }

    #[test]
    fn to_row_keeps_column_order() {
        let row = RsvpEntry {
            name: "Bo".to_string(),
            guests: 3,
            ..RsvpEntry::default()
        }
        .to_row();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, FIELD_NAMES);
        assert_eq!(row["guests"], 3);
    }

    #[test]
    fn strict_decode_rejects_legacy_keys() {
        let result: Result<RsvpEntry, _> = serde_json::from_str(r#"{"Name":"A","Email":"b@x.com"}"#);
        assert!(result.is_err());
    }
}
