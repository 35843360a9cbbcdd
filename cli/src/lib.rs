//! Command-line host for the RSVP gateway.
//!
//! Loads configuration, installs logging, and executes the core's requests
//! over HTTP with ureq. The binary in `main.rs` is a thin clap layer over
//! `App`.

pub mod app;
pub mod config;
pub mod logging;
pub mod transport;

pub use app::{render_table, App, Status};
pub use config::AppConfig;
pub use transport::UreqTransport;
