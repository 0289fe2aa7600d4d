//! Session credentials and durable token storage.
//!
//! ARCHITECTURE
//! ============
//! The token lives in exactly one place, the [`Session`] slot, shared by
//! reference with the transport (which reads it per request) and the
//! [`CredentialStore`] (the single writer). Every change is mirrored into
//! the token file and into the transport's default `Authorization` header,
//! so the three views never drift.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::net::Transport;

/// Shared credential slot.
///
/// Created empty at startup; set on login/register/restore; cleared on
/// logout. Only the [`CredentialStore`] writes it.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if one is set.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

/// Durable single-slot token storage: one file holding the raw token.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token, if any.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() { None } else { Some(token.to_string()) }
    }

    /// Write `token`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be written.
    pub fn store(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)
    }

    /// Remove the stored token; an absent file is not an error.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when removal fails.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Single writer of credential state.
///
/// Applies every change to the session slot, the token file, and the
/// transport's default `Authorization` header together. Storage I/O
/// failures are logged and do not fail the credential change.
pub struct CredentialStore {
    session: Arc<Session>,
    transport: Arc<Transport>,
    file: TokenFile,
}

impl CredentialStore {
    pub(crate) fn new(session: Arc<Session>, transport: Arc<Transport>, file: TokenFile) -> Self {
        Self { session, transport, file }
    }

    /// Set or clear the current credential.
    ///
    /// Clearing leaves the transport's default `Authorization` header
    /// present but empty; the per-request injection never fires without a
    /// token, so the wire sees the empty header only through the default.
    pub fn set(&self, token: Option<&str>) {
        match token {
            Some(token) => {
                self.session.set(Some(token.to_string()));
                if let Err(err) = self.file.store(token) {
                    tracing::warn!(path = %self.file.path().display(), error = %err, "token file write failed");
                }
                self.transport.set_default_authorization(Some(token));
            }
            None => {
                self.session.set(None);
                if let Err(err) = self.file.clear() {
                    tracing::warn!(path = %self.file.path().display(), error = %err, "token file remove failed");
                }
                self.transport.set_default_authorization(None);
            }
        }
    }

    /// Restore a previously stored token from disk, if present.
    ///
    /// Applies the token exactly as a fresh [`CredentialStore::set`] would
    /// and returns it so callers can seed application state.
    pub fn restore(&self) -> Option<String> {
        let token = self.file.load()?;
        self.set(Some(&token));
        Some(token)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
