//! Stateless request builder and response parser for the RSVP store.
//!
//! # Design
//! `RsvpClient` holds only the (optional) endpoint and the add encoding.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`;
//! `submit_entry` / `list_entries` glue the two around a caller-supplied
//! `Transport`. An unconfigured client fails in `build_*`, so no request
//! value ever reaches a transport.
//!
//! Adds are at-most-once: one request per call, no retry, no dedupe key.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::endpoint::StoreEndpoint;
use crate::error::GatewayError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::normalize::{normalize_rows, ListPayload};
use crate::types::{AddAck, AddEncoding, NewEntry, RsvpEntry};

/// Synchronous, stateless client for the RSVP store script.
#[derive(Debug, Clone, Default)]
pub struct RsvpClient {
    endpoint: Option<StoreEndpoint>,
    encoding: AddEncoding,
}

impl RsvpClient {
    /// A client for `endpoint_url`. Missing or unrecognized URLs produce an
    /// unconfigured client rather than an error.
    pub fn new(endpoint_url: Option<&str>) -> Self {
        Self {
            endpoint: StoreEndpoint::parse(endpoint_url),
            encoding: AddEncoding::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: AddEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn encoding(&self) -> AddEncoding {
        self.encoding
    }

    fn endpoint(&self) -> Result<&StoreEndpoint, GatewayError> {
        self.endpoint.as_ref().ok_or(GatewayError::NotConfigured)
    }

    pub fn build_list_entries(&self) -> Result<HttpRequest, GatewayError> {
        let endpoint = self.endpoint()?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: endpoint.with_query("action=list"),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Build the add request. `now` stamps entries that carry no timestamp.
    pub fn build_submit_entry(&self, entry: &NewEntry, now: DateTime<Utc>) -> Result<HttpRequest, GatewayError> {
        let endpoint = self.endpoint()?;
        let timestamp = match entry.timestamp.as_deref() {
            Some(ts) if !ts.is_empty() => ts.to_string(),
            _ => now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        match self.encoding {
            AddEncoding::Query => {
                let guests = entry.guests.to_string();
                let fields = [
                    ("action", "add"),
                    ("name", entry.name.as_str()),
                    ("email", entry.email.as_str()),
                    ("attending", entry.attending.as_str()),
                    ("guests", guests.as_str()),
                    ("message", entry.message.as_str()),
                    ("timestamp", timestamp.as_str()),
                ];
                let query = fields
                    .iter()
                    .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
                    .collect::<Vec<_>>()
                    .join("&");
                Ok(HttpRequest {
                    method: HttpMethod::Get,
                    url: endpoint.with_query(&query),
                    headers: Vec::new(),
                    body: None,
                })
            }
            AddEncoding::JsonBody => {
                let payload = json!({
                    "action": "add",
                    "entry": {
                        "name": entry.name,
                        "email": entry.email,
                        "attending": entry.attending.as_str(),
                        "guests": entry.guests,
                        "message": entry.message,
                        "timestamp": timestamp,
                    }
                });
                let body =
                    serde_json::to_string(&payload).map_err(|e| GatewayError::Serialization(e.to_string()))?;
                Ok(HttpRequest {
                    method: HttpMethod::Post,
                    url: endpoint.as_str().to_string(),
                    headers: vec![("content-type".to_string(), "application/json".to_string())],
                    body: Some(body),
                })
            }
        }
    }

    /// Parse a list response into normalized entries.
    ///
    /// Bodies that are not JSON, or JSON in neither known shape, count as an
    /// empty sheet.
    pub fn parse_list_entries(&self, response: HttpResponse) -> Result<Vec<RsvpEntry>, GatewayError> {
        if !response.is_success() {
            return Err(GatewayError::ListFailed { status: response.status });
        }
        let payload: ListPayload = match serde_json::from_str(&response.body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "list response is not JSON, treating as empty");
                return Ok(Vec::new());
            }
        };
        if let ListPayload::Other(Value::Object(ref obj)) = payload {
            if let Some(message) = obj.get("error").and_then(Value::as_str) {
                warn!(%message, "store reported an error while listing");
            }
        }
        Ok(normalize_rows(payload.into_rows()))
    }

    pub fn parse_submit_entry(&self, response: HttpResponse) -> Result<AddAck, GatewayError> {
        if !response.is_success() {
            return Err(GatewayError::AddFailed { status: response.status });
        }
        let value: Value =
            serde_json::from_str(&response.body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        let obj = value
            .as_object()
            .ok_or_else(|| GatewayError::MalformedResponse(format!("expected a JSON object, got {value}")))?;
        if let Some(error) = obj.get("error") {
            let message = error.as_str().map_or_else(|| error.to_string(), str::to_string);
            return Err(GatewayError::Rejected(message));
        }
        if obj.get("ok").and_then(Value::as_bool) == Some(false) {
            return Err(GatewayError::Rejected("store returned ok:false".to_string()));
        }
        Ok(AddAck { ok: true })
    }

    /// Append one entry to the store through `transport`.
    pub fn submit_entry<T: Transport + ?Sized>(&self, transport: &T, entry: &NewEntry) -> Result<AddAck, GatewayError> {
        let request = self.build_submit_entry(entry, Utc::now())?;
        let submission_id = Uuid::new_v4();
        let span = info_span!("submit_entry", %submission_id, encoding = ?self.encoding);
        let _guard = span.enter();

        debug!(method = ?request.method, "sending add request");
        let response = transport.execute(request).map_err(GatewayError::Transport)?;
        let ack = self.parse_submit_entry(response)?;
        info!(ok = ack.ok, "rsvp saved");
        Ok(ack)
    }

    /// Fetch a snapshot of every entry in the store through `transport`.
    pub fn list_entries<T: Transport + ?Sized>(&self, transport: &T) -> Result<Vec<RsvpEntry>, GatewayError> {
        let request = self.build_list_entries()?;
        debug!(url = %request.url, "sending list request");
        let response = transport.execute(request).map_err(GatewayError::Transport)?;
        let entries = self.parse_list_entries(response)?;
        info!(count = entries.len(), "rsvps listed");
        Ok(entries)
    }

    /// `list_entries` for the admin view: any failure shows as zero rows so
    /// the admin can simply refresh again.
    pub fn list_entries_or_empty<T: Transport + ?Sized>(&self, transport: &T) -> Vec<RsvpEntry> {
        self.list_entries(transport).unwrap_or_else(|e| {
            warn!(error = %e, "listing rsvps failed, showing none");
            Vec::new()
        })
    }
}
