use std::sync::{PoisonError, RwLock};

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

/// Name of the session cookie the panel issues on login.
pub const SESSION_COOKIE: &str = "3x-ui";

/// Username/password pair used for the form login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Holder for the session token.
///
/// Reads and writes go through an `RwLock`, so a `PanelClient` can be shared
/// across tasks while one of them re-authenticates. A poisoned lock is
/// recovered rather than propagated; the token is a plain value with no
/// invariants a panicking writer could break.
#[derive(Debug, Default)]
pub(crate) struct Session {
    token: RwLock<Option<SecretString>>,
}

impl Session {
    pub(crate) fn set(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn is_set(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The `Cookie` header value for the current token, if any.
    ///
    /// Returns `None` when no token is held or the token contains bytes that
    /// are not valid in a header.
    pub(crate) fn cookie_header(&self) -> Option<HeaderValue> {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        let token = guard.as_ref()?;
        let mut value =
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", token.expose_secret())).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_has_no_cookie() {
        let session = Session::default();
        assert!(!session.is_set());
        assert!(session.cookie_header().is_none());
    }

    #[test]
    fn cookie_header_carries_token() {
        let session = Session::default();
        session.set(SecretString::from("abc123".to_owned()));
        assert!(session.is_set());
        let header = session.cookie_header().unwrap();
        assert_eq!(header.to_str().unwrap(), "3x-ui=abc123");
        assert!(header.is_sensitive());

        session.clear();
        assert!(session.cookie_header().is_none());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
