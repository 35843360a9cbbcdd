//! Client core for a wedding site's spreadsheet-backed RSVP store.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Hosts either execute the
//! round-trip themselves or hand a `Transport` to the convenience methods.
//!
//! # Design
//! - `RsvpClient` is stateless: it holds only the endpoint and add encoding.
//!   An unconfigured client refuses to build requests.
//! - Store rows come back in several historical shapes; `normalize` turns
//!   them into `RsvpEntry` so nothing downstream sees the difference.
//! - `export` renders the loaded list as CSV or XLSX.
//! - `admin` and `form` hold the page-level state the view layer renders
//!   from, passed around explicitly rather than read from globals.

pub mod admin;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod export;
pub mod form;
pub mod http;
pub mod normalize;
pub mod types;

pub use admin::{
    can_see_admin, can_show_sheets_warning, AdminGate, AdminSession, GrantSource, MemorySessionStorage, SessionStorage,
};
pub use client::RsvpClient;
pub use endpoint::StoreEndpoint;
pub use error::{AdminError, ExportError, GatewayError};
pub use export::{entries_to_csv, export_entries, to_csv, ExportFile, ExportFormat};
pub use form::{FormMode, RsvpForm, SubmissionState};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::{validate_entry, AddAck, AddEncoding, Attendance, NewEntry, RsvpEntry};
