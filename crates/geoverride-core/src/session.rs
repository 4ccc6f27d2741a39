// crates/geoverride-core/src/session.rs

//! Auth session for the admin REST backend.
//!
//! The session is an explicit value injected into every collaborator that
//! makes requests. It is created on login and cleared on logout or when the
//! backend answers `401`.

use crate::error::{GeoOverrideError, Result};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Session handle shared between request-making collaborators.
pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Clone, Default)]
pub struct Session {
    base_url: String,
    token: Option<String>,
}

impl Session {
    /// Starts a session against `base_url` (trailing slashes are dropped).
    /// A blank token yields a logged-out session.
    pub fn login(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let token = token.into().trim().to_owned();
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_owned(),
            token: (!token.is_empty()).then_some(token),
        }
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> Result<String> {
        self.token
            .as_deref()
            .map(|t| format!("Bearer {t}"))
            .ok_or(GeoOverrideError::Unauthorized)
    }

    /// Absolute URL of an API path such as `/settings`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }
}

// Never print the token.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_logout_cycle() {
        let mut s = Session::login("https://admin.example.org/api/", " abc ");
        assert!(s.is_active());
        assert_eq!(s.bearer().unwrap(), "Bearer abc");
        assert_eq!(s.url("/settings"), "https://admin.example.org/api/settings");

        s.logout();
        assert!(matches!(s.bearer(), Err(GeoOverrideError::Unauthorized)));
    }

    #[test]
    fn blank_token_is_logged_out() {
        assert!(!Session::login("http://x", "  ").is_active());
    }

    #[test]
    fn debug_hides_token() {
        let s = Session::login("http://x", "secret");
        assert!(!format!("{s:?}").contains("secret"));
    }
}
