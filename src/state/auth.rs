//! Auth lifecycle state machine.
//!
//! DESIGN
//! ======
//! A status-tagged state advanced by explicit lifecycle events. Events form
//! a tagged union instead of name-matched strings: `Pending` matches every
//! operation generically, mirroring the single loading transition, and the
//! success path lands through the reducer rather than inline in the
//! operations.
//!
//! KNOWN ASYMMETRY
//! ===============
//! Only `Login` rejections land in state; `Register`/`GetUser`/`UpdateUser`
//! rejections leave state untouched beyond the earlier `Pending`. Tests pin
//! this so completing the matrix is a deliberate change, not a drive-by.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use crate::net::types::{User, UserUpdate, split_token};
use crate::net::{ApiClient, ApiError};

// =============================================================================
// STATE
// =============================================================================

/// Lifecycle position of the auth flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Auth operation whose lifecycle events drive the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOp {
    Login,
    Register,
    GetUser,
    UpdateUser,
}

/// Lifecycle event applied to [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    Pending(AuthOp),
    Fulfilled { op: AuthOp, token: Option<String>, user: User },
    Rejected { op: AuthOp, error: ApiError },
    Logout,
    SetToken(Option<String>),
}

/// Current auth state.
///
/// `Success` implies a user is present and no error; `Error` implies an
/// error is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub status: Status,
    pub user: Option<User>,
    pub token: Option<String>,
    pub error: Option<ApiError>,
}

impl AuthState {
    /// Apply one lifecycle event.
    pub fn apply(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::Pending(_) => self.status = Status::Loading,
            AuthEvent::Fulfilled { op: _, token, user } => {
                self.status = Status::Success;
                self.token = token;
                self.user = Some(user);
                self.error = None;
            }
            AuthEvent::Rejected { op: AuthOp::Login, error } => {
                self.status = Status::Error;
                self.error = Some(error);
            }
            // Rejections of the remaining operations are not wired; see the
            // module docs.
            AuthEvent::Rejected { .. } => {}
            AuthEvent::Logout => *self = Self::default(),
            AuthEvent::SetToken(token) => self.token = token,
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Drives auth lifecycle operations and owns the live [`AuthState`].
///
/// Every operation dispatches `Pending` before the call and `Fulfilled` or
/// `Rejected` when it settles; events apply in settlement order. An
/// operation invoked while another is in flight is suppressed entirely.
pub struct AuthStore {
    state: RwLock<AuthState>,
    client: Arc<ApiClient>,
}

impl AuthStore {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { state: RwLock::new(AuthState::default()), client }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.state.read().unwrap_or_else(PoisonError::into_inner).status
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the normalized error; it is also captured into state.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.run(AuthOp::Login, self.client.auth.login(email, password)).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for the caller to present.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        self.run(AuthOp::Register, self.client.auth.register(username, email, password)).await
    }

    /// Fetch the authenticated user into state.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for the caller to present.
    pub async fn fetch_current_user(&self) -> Result<(), ApiError> {
        self.run(AuthOp::GetUser, self.client.auth.current()).await
    }

    /// Update the authenticated user's settings.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for the caller to present.
    pub async fn update_user(&self, update: &UserUpdate) -> Result<(), ApiError> {
        self.run(AuthOp::UpdateUser, self.client.auth.save(update)).await
    }

    /// Clear the credential and reset state to its initial value.
    pub fn logout(&self) {
        self.client.credentials().set(None);
        self.dispatch(AuthEvent::Logout);
    }

    /// Set only the token field, leaving status, user, and error untouched.
    pub fn set_token(&self, token: Option<String>) {
        self.dispatch(AuthEvent::SetToken(token));
    }

    /// Restore a persisted credential into the session and state.
    pub fn restore(&self) -> Option<String> {
        let token = self.client.credentials().restore()?;
        self.set_token(Some(token.clone()));
        Some(token)
    }

    async fn run<F>(&self, op: AuthOp, call: F) -> Result<(), ApiError>
    where
        F: Future<Output = Result<User, ApiError>>,
    {
        if self.status() == Status::Loading {
            tracing::debug!(?op, "auth operation suppressed; another is in flight");
            return Ok(());
        }

        self.dispatch(AuthEvent::Pending(op));
        match call.await {
            Ok(user) => {
                let (token, user) = split_token(user);
                if let Some(token) = token.as_deref() {
                    self.client.credentials().set(Some(token));
                }
                self.dispatch(AuthEvent::Fulfilled { op, token, user });
                Ok(())
            }
            Err(error) => {
                self.dispatch(AuthEvent::Rejected { op, error: error.clone() });
                Err(error)
            }
        }
    }

    fn dispatch(&self, event: AuthEvent) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).apply(event);
    }
}
