//! RSVP form state as driven by the page.
//!
//! The inline page and the modal share this one implementation; `FormMode`
//! only changes what happens to the form after a successful save.

use tracing::debug;

use crate::client::RsvpClient;
use crate::error::GatewayError;
use crate::http::Transport;
use crate::types::{validate_entry, AddAck, NewEntry};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in your name and email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    InlinePage,
    Modal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Saving,
    Success,
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct RsvpForm {
    mode: FormMode,
    entry: NewEntry,
    state: SubmissionState,
}

impl RsvpForm {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn entry(&self) -> &NewEntry {
        &self.entry
    }

    pub fn entry_mut(&mut self) -> &mut NewEntry {
        &mut self.entry
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// The submit button is disabled while a save is outstanding.
    pub fn can_submit(&self) -> bool {
        self.state != SubmissionState::Saving
    }

    /// Start a submission. Returns the entry to send, or `None` when a save
    /// is already in flight or validation fails (state becomes `Error`).
    pub fn begin(&mut self) -> Option<NewEntry> {
        if !self.can_submit() {
            return None;
        }
        if !validate_entry(&self.entry) {
            self.state = SubmissionState::Error(MISSING_FIELDS_MESSAGE.to_string());
            return None;
        }
        self.state = SubmissionState::Saving;
        Some(self.entry.clone())
    }

    /// Record the outcome of the submission started by `begin`.
    pub fn finish(&mut self, result: &Result<AddAck, GatewayError>) {
        self.state = match result {
            Ok(AddAck { ok: true }) => SubmissionState::Success,
            Ok(AddAck { ok: false }) => {
                SubmissionState::Error(GatewayError::Rejected(String::new()).user_message().to_string())
            }
            Err(e) => SubmissionState::Error(e.user_message().to_string()),
        };
        debug!(state = ?self.state, "submission finished");
        if self.state == SubmissionState::Success && self.mode == FormMode::Modal {
            self.entry = NewEntry::default();
        }
    }

    /// `begin`, send through `client`, `finish`.
    pub fn submit<T: Transport + ?Sized>(&mut self, client: &RsvpClient, transport: &T) -> &SubmissionState {
        if let Some(entry) = self.begin() {
            let result = client.submit_entry(transport, &entry);
            self.finish(&result);
        }
        &self.state
    }

    pub fn reset(&mut self) {
        self.entry = NewEntry::default();
        self.state = SubmissionState::Idle;
    }
}
