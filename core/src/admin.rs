//! Admin display-mode gate.
//!
//! This is a toggle for showing the response list and export tools, not
//! access control: the code ships to every client and is compared in
//! plaintext.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::AdminError;

/// Code accepted when no admin secret is configured.
pub const DEFAULT_ADMIN_CODE: &str = "1";

/// Key under which a grant is kept in session storage.
pub const ADMIN_GRANT_KEY: &str = "isAdmin";

const GRANT_VALUE: &str = "1";

/// How the current admin grant was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantSource {
    UrlToken,
    ManualLogin,
    StoredGrant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEvent {
    UrlTokenMatch,
    ManualLoginMatch,
    StoredGrantFound,
    Logout,
}

/// Viewer mode passed explicitly into the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminSession {
    #[default]
    Guest,
    Admin(GrantSource),
}

impl AdminSession {
    pub fn is_admin(&self) -> bool {
        matches!(self, AdminSession::Admin(_))
    }

    pub fn source(&self) -> Option<GrantSource> {
        match self {
            AdminSession::Admin(source) => Some(*source),
            AdminSession::Guest => None,
        }
    }

    /// State transition. An existing grant keeps its original source.
    pub fn apply(self, event: AdminEvent) -> AdminSession {
        match (self, event) {
            (_, AdminEvent::Logout) => AdminSession::Guest,
            (AdminSession::Admin(source), _) => AdminSession::Admin(source),
            (AdminSession::Guest, AdminEvent::UrlTokenMatch) => AdminSession::Admin(GrantSource::UrlToken),
            (AdminSession::Guest, AdminEvent::ManualLoginMatch) => AdminSession::Admin(GrantSource::ManualLogin),
            (AdminSession::Guest, AdminEvent::StoredGrantFound) => AdminSession::Admin(GrantSource::StoredGrant),
        }
    }
}

/// Session-scoped key/value storage that outlives a single page view.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    values: HashMap<String, String>,
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Compares candidate codes against the configured secret.
#[derive(Debug, Clone)]
pub struct AdminGate {
    code: String,
}

impl AdminGate {
    /// A blank or missing secret falls back to `DEFAULT_ADMIN_CODE`.
    pub fn new(secret: Option<&str>) -> Self {
        let code = secret
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ADMIN_CODE);
        Self { code: code.to_string() }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        candidate.trim() == self.code
    }

    /// Resolve the viewer mode for a page load: a matching query token
    /// grants (and persists) admin, otherwise a stored grant is honoured.
    pub fn resolve(&self, query_token: Option<&str>, storage: &mut dyn SessionStorage) -> AdminSession {
        if query_token.is_some_and(|token| self.matches(token)) {
            storage.set(ADMIN_GRANT_KEY, GRANT_VALUE);
            debug!("admin granted from url token");
            return AdminSession::Guest.apply(AdminEvent::UrlTokenMatch);
        }
        if storage.get(ADMIN_GRANT_KEY).as_deref() == Some(GRANT_VALUE) {
            return AdminSession::Guest.apply(AdminEvent::StoredGrantFound);
        }
        AdminSession::Guest
    }

    /// Manual login from the admin prompt. A wrong code leaves `session`
    /// untouched.
    pub fn login(
        &self,
        session: AdminSession,
        code: &str,
        storage: &mut dyn SessionStorage,
    ) -> Result<AdminSession, AdminError> {
        if !self.matches(code) {
            return Err(AdminError::InvalidCode);
        }
        storage.set(ADMIN_GRANT_KEY, GRANT_VALUE);
        info!("admin login accepted");
        Ok(session.apply(AdminEvent::ManualLoginMatch))
    }

    pub fn logout(&self, session: AdminSession, storage: &mut dyn SessionStorage) -> AdminSession {
        storage.remove(ADMIN_GRANT_KEY);
        session.apply(AdminEvent::Logout)
    }
}

/// Admin tooling renders only with a configured store and an admin viewer.
pub fn can_see_admin(configured: bool, is_admin: bool) -> bool {
    configured && is_admin
}

/// The "store not configured" warning is for admins only.
pub fn can_show_sheets_warning(configured: bool, is_admin: bool) -> bool {
    is_admin && !configured
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(!can_see_admin(false, true));
        assert!(can_see_admin(true, true));
        assert!(!can_see_admin(true, false));
        assert!(!can_show_sheets_warning(true, true));
        assert!(can_show_sheets_warning(false, true));
        assert!(!can_show_sheets_warning(false, false));
    }

    #[test]
    fn fallback_code_when_unset() {
        assert!(AdminGate::new(None).matches("1"));
        assert!(AdminGate::new(Some("  ")).matches("1"));
        assert!(!AdminGate::new(Some("s3cret")).matches("1"));
        assert!(AdminGate::new(Some("s3cret")).matches(" s3cret "));
    }

    #[test]
    fn url_token_grants_and_persists() {
        let gate = AdminGate::new(Some("s3cret"));
        let mut storage = MemorySessionStorage::default();

        let session = gate.resolve(Some("s3cret"), &mut storage);
        assert_eq!(session, AdminSession::Admin(GrantSource::UrlToken));

        // later page load without the token
        let session = gate.resolve(None, &mut storage);
        assert_eq!(session, AdminSession::Admin(GrantSource::StoredGrant));
    }

    #[test]
    fn wrong_token_is_guest() {
        let gate = AdminGate::new(Some("s3cret"));
        let mut storage = MemorySessionStorage::default();
        assert_eq!(gate.resolve(Some("guess"), &mut storage), AdminSession::Guest);
        assert_eq!(storage.get(ADMIN_GRANT_KEY), None);
    }

    #[test]
    fn manual_login() {
        let gate = AdminGate::new(None);
        let mut storage = MemorySessionStorage::default();

        let err = gate.login(AdminSession::Guest, "nope", &mut storage).unwrap_err();
        assert_eq!(err, AdminError::InvalidCode);
        assert_eq!(err.to_string(), "Invalid admin code");
        assert_eq!(storage.get(ADMIN_GRANT_KEY), None);

        let session = gate.login(AdminSession::Guest, "1", &mut storage).unwrap();
        assert_eq!(session.source(), Some(GrantSource::ManualLogin));
        assert_eq!(storage.get(ADMIN_GRANT_KEY).as_deref(), Some("1"));
    }

    #[test]
    fn logout_clears_grant() {
        let gate = AdminGate::new(None);
        let mut storage = MemorySessionStorage::default();
        let session = gate.resolve(Some("1"), &mut storage);
        assert!(session.is_admin());

        let session = gate.logout(session, &mut storage);
        assert_eq!(session, AdminSession::Guest);
        assert_eq!(gate.resolve(None, &mut storage), AdminSession::Guest);
    }

    #[test]
    fn existing_grant_keeps_source() {
        let session = AdminSession::Admin(GrantSource::UrlToken).apply(AdminEvent::ManualLoginMatch);
        assert_eq!(session.source(), Some(GrantSource::UrlToken));
    }
}
