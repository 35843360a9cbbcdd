//! Error types for the RSVP gateway.
//!
//! # Design
//! Callers distinguish "no store configured" from "the store answered badly"
//! from "the request never completed", so each gets its own variant. Status
//! failures are split by operation because the UI reports list and add
//! failures differently.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `RsvpClient` build, parse and round-trip methods.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No store endpoint URL is configured; no request was attempted.
    #[error("RSVP store is not configured")]
    NotConfigured,

    /// The store answered a list request with a non-2xx status.
    #[error("listing RSVPs failed with HTTP {status}")]
    ListFailed { status: u16 },

    /// The store answered an add request with a non-2xx status.
    #[error("saving RSVP failed with HTTP {status}")]
    AddFailed { status: u16 },

    /// The request never completed (DNS, connect, timeout, reset).
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The body was not JSON or lacked the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The store answered 2xx but reported a script error.
    #[error("store rejected the request: {0}")]
    Rejected(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl GatewayError {
    /// Message suitable for showing to a guest in the RSVP form.
    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::NotConfigured => "RSVPs are not open yet. Please try again later.",
            GatewayError::Transport(_) => "We could not reach the server. Please try again.",
            _ => "Something went wrong while saving your RSVP. Please try again.",
        }
    }
}

/// Errors from building an XLSX export. CSV export cannot fail.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("xlsx export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Errors from the admin gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("Invalid admin code")]
    InvalidCode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status() {
        let err = GatewayError::ListFailed { status: 503 };
        assert_eq!(err.to_string(), "listing RSVPs failed with HTTP 503");
        let err = GatewayError::AddFailed { status: 400 };
        assert_eq!(err.to_string(), "saving RSVP failed with HTTP 400");
    }

    #[test]
    fn transport_keeps_source() {
        use std::error::Error as _;
        let cause: TransportError = "connection reset".into();
        let err = GatewayError::Transport(cause);
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("connection reset"));
    }

    #[test]
    fn not_configured_has_distinct_user_message() {
        assert_ne!(
            GatewayError::NotConfigured.user_message(),
            GatewayError::AddFailed { status: 500 }.user_message()
        );
    }
}
