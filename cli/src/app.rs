//! Host-side operations behind the `rsvp` subcommands.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use rsvp_core::{
    can_see_admin, can_show_sheets_warning, export_entries, AddEncoding, AdminGate, AdminSession, ExportFormat, FormMode,
    MemorySessionStorage, NewEntry, RsvpClient, RsvpEntry, RsvpForm, SubmissionState, Transport,
};
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::transport::UreqTransport;

pub const SHEETS_WARNING: &str =
    "RSVP store is not configured: set store.endpoint_url (or RSVP__STORE__ENDPOINT_URL) to collect responses";

/// What `rsvp status` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub configured: bool,
    pub is_admin: bool,
    pub can_see_admin: bool,
    pub sheets_warning: Option<&'static str>,
}

pub struct App<T> {
    client: RsvpClient,
    gate: AdminGate,
    transport: T,
    storage: MemorySessionStorage,
}

impl App<UreqTransport> {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let encoding = config.store.encoding()?;
        let client = RsvpClient::new(config.store.endpoint_url.as_deref()).with_encoding(encoding);
        let gate = AdminGate::new(config.store.admin_secret.as_deref());
        let transport = UreqTransport::new(config.store.timeout_secs.map(Duration::from_secs));
        Ok(Self::new(client, gate, transport))
    }
}

impl<T: Transport> App<T> {
    pub fn new(client: RsvpClient, gate: AdminGate, transport: T) -> Self {
        Self {
            client,
            gate,
            transport,
            storage: MemorySessionStorage::default(),
        }
    }

    /// The `--admin-code` flag plays the role of the page's query token.
    pub fn admin_session(&mut self, admin_code: Option<&str>) -> AdminSession {
        self.gate.resolve(admin_code, &mut self.storage)
    }

    pub fn status(&mut self, admin_code: Option<&str>) -> Status {
        let configured = self.client.is_configured();
        let is_admin = self.admin_session(admin_code).is_admin();
        Status {
            configured,
            is_admin,
            can_see_admin: can_see_admin(configured, is_admin),
            sheets_warning: can_show_sheets_warning(configured, is_admin).then_some(SHEETS_WARNING),
        }
    }

    /// Submit one RSVP through the same form state the page uses.
    pub fn submit(&self, entry: NewEntry) -> SubmissionState {
        self.submit_encoded(entry, self.client.encoding())
    }

    /// Like `submit`, but sends the add in `encoding` whatever the
    /// configured default is.
    pub fn submit_encoded(&self, entry: NewEntry, encoding: AddEncoding) -> SubmissionState {
        let client = self.client.clone().with_encoding(encoding);
        let mut form = RsvpForm::new(FormMode::InlinePage);
        *form.entry_mut() = entry;
        form.submit(&client, &self.transport).clone()
    }

    /// Snapshot of all responses. A failed refresh lists nothing.
    pub fn list(&mut self, admin_code: Option<&str>) -> Result<Vec<RsvpEntry>> {
        self.require_admin(admin_code)?;
        Ok(self.client.list_entries_or_empty(&self.transport))
    }

    /// Write the export into `out_dir` and return its path.
    pub fn export(&mut self, admin_code: Option<&str>, format: ExportFormat, out_dir: &Path) -> Result<PathBuf> {
        let entries = self.list(admin_code)?;
        let file = export_entries(&entries, format);
        let path = out_dir.join(file.file_name);
        std::fs::write(&path, &file.bytes).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = entries.len(), "export written");
        Ok(path)
    }

    fn require_admin(&mut self, admin_code: Option<&str>) -> Result<()> {
        let status = self.status(admin_code);
        if let Some(warning) = status.sheets_warning {
            bail!(warning);
        }
        if !status.can_see_admin {
            bail!("admin access required: pass a valid --admin-code");
        }
        Ok(())
    }
}

/// Fixed-width table of entries for terminal output.
pub fn render_table(entries: &[RsvpEntry]) -> String {
    const HEADERS: [&str; 6] = ["Name", "Email", "Attending", "Guests", "Message", "Timestamp"];

    let rows: Vec<[String; 6]> = entries
        .iter()
        .map(|e| {
            [
                e.name.clone(),
                e.email.clone(),
                e.attending.clone(),
                e.guests.to_string(),
                e.message.replace('\n', " "),
                e.timestamp.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut write_line = |cells: &[&str]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    };
    write_line(&HEADERS);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        write_line(&cells);
    }
    let total_guests: u64 = entries.iter().map(|e| u64::from(e.guests)).sum();
    let noun = if entries.len() == 1 { "response" } else { "responses" };
    let _ = write!(out, "{} {noun}, {total_guests} additional guests", entries.len());
    out
}
