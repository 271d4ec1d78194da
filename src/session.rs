//! Session guard.
//!
//! The credential is a single named cookie holding an opaque bearer token.
//! Its presence is the only signal that the user is authenticated.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use regex::Regex;

use crate::error::SessionError;

pub trait CredentialStore: Send {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&mut self, token: &str) -> Result<(), SessionError>;
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// File-backed cookie jar holding one `name=value; path=/` line.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
    name: String,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { path: path.into(), name: name.into() }
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io { path: self.path.display().to_string(), source }
    }
}

/// Extracts the value of cookie `name` from a `Cookie`-style header line.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    let pattern = format!(r"(?:^|;)\s*{}\s*=\s*([^;]*)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(header)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl CredentialStore for CookieJar {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.lines().find_map(|line| cookie_value(line, &self.name))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&mut self, token: &str) -> Result<(), SessionError> {
        fs::write(&self.path, format!("{}={}; path=/\n", self.name, token)).map_err(|e| self.io_error(e))
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    token: Option<String>,
}

impl InMemoryCredentials {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }
}

impl CredentialStore for InMemoryCredentials {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<(), SessionError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.token = None;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated,
    /// The auth modal is open in the given sub-mode.
    Unauthenticated(AuthMode),
}

pub struct SessionGuard {
    store: Box<dyn CredentialStore>,
    status: SessionStatus,
}

impl SessionGuard {
    /// Reads the persisted credential once, at startup.
    pub fn restore(store: Box<dyn CredentialStore>) -> Self {
        let status = match store.load() {
            Ok(Some(_)) => SessionStatus::Authenticated,
            Ok(None) => SessionStatus::Unauthenticated(AuthMode::Login),
            Err(err) => {
                tracing::warn!(error = %err, "cannot read stored credential, starting signed out");
                SessionStatus::Unauthenticated(AuthMode::Login)
            }
        };
        tracing::info!(?status, "session restored");
        Self { store, status }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub fn auth_mode(&self) -> Option<AuthMode> {
        match self.status {
            SessionStatus::Unauthenticated(mode) => Some(mode),
            SessionStatus::Authenticated => None,
        }
    }

    pub fn toggle_mode(&mut self) {
        if let SessionStatus::Unauthenticated(mode) = self.status {
            self.status = SessionStatus::Unauthenticated(mode.toggled());
        }
    }

    /// Bearer token for an authorized call, read at the moment of the call.
    pub fn bearer(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::error!(error = %err, "cannot read stored credential");
                None
            }
        }
    }

    /// Persists a freshly issued token and closes the auth modal.
    pub fn authenticate(&mut self, token: &str) -> Result<(), SessionError> {
        self.store.save(token)?;
        self.status = SessionStatus::Authenticated;
        tracing::info!("signed in");
        Ok(())
    }

    /// Drops the credential and re-opens the modal in login mode.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        let cleared = self.store.clear();
        self.status = SessionStatus::Unauthenticated(AuthMode::Login);
        tracing::info!("signed out");
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_picks_the_named_cookie() {
        assert_eq!(cookie_value("token=abc; path=/", "token"), Some("abc".to_string()));
        assert_eq!(cookie_value("theme=dark; token = xyz ; other=1", "token"), Some("xyz".to_string()));
        assert_eq!(cookie_value("mytoken=abc", "token"), None);
        assert_eq!(cookie_value("token=; Max-Age=0", "token"), None);
    }

    #[test]
    fn cookie_jar_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut jar = CookieJar::new(dir.path().join("session.cookie"), "token");
        assert_eq!(jar.load().unwrap(), None);

        jar.save("secret-1").unwrap();
        assert_eq!(jar.load().unwrap(), Some("secret-1".to_string()));

        jar.clear().unwrap();
        assert_eq!(jar.load().unwrap(), None);
        jar.clear().unwrap();
    }

    #[test]
    fn missing_credential_opens_login() {
        let guard = SessionGuard::restore(Box::new(InMemoryCredentials::default()));
        assert_eq!(guard.status(), SessionStatus::Unauthenticated(AuthMode::Login));
        assert_eq!(guard.bearer(), None);
    }

    #[test]
    fn stored_credential_authenticates_on_startup() {
        let guard = SessionGuard::restore(Box::new(InMemoryCredentials::with_token("t")));
        assert!(guard.is_authenticated());
        assert_eq!(guard.bearer(), Some("t".to_string()));
    }

    #[test]
    fn toggle_switches_sub_mode_only_while_signed_out() {
        let mut guard = SessionGuard::restore(Box::new(InMemoryCredentials::default()));
        guard.toggle_mode();
        assert_eq!(guard.auth_mode(), Some(AuthMode::Register));
        guard.toggle_mode();
        assert_eq!(guard.auth_mode(), Some(AuthMode::Login));

        guard.authenticate("t").unwrap();
        guard.toggle_mode();
        assert!(guard.is_authenticated());
    }

    #[test]
    fn logout_clears_the_credential_and_reopens_login() {
        let mut guard = SessionGuard::restore(Box::new(InMemoryCredentials::with_token("t")));
        guard.toggle_mode();
        guard.logout().unwrap();
        assert_eq!(guard.status(), SessionStatus::Unauthenticated(AuthMode::Login));
        assert_eq!(guard.bearer(), None);
    }
}
