//! # conduit-client
//!
//! Data-access layer for a Conduit-style social blogging backend. Wraps the
//! REST API behind typed resource clients, centralizes credential handling
//! and error normalization in a single transport, and tracks the
//! login/register lifecycle in a small status state machine.
//!
//! The crate is UI-agnostic: views call [`net::ApiClient`] for resources
//! and [`state::auth::AuthStore`] for the auth lifecycle. No caching, no
//! retries, no request cancellation — every call maps to one backend
//! round-trip.

pub mod config;
pub mod net;
pub mod session;
pub mod state;

pub use config::ClientConfig;
pub use net::{ApiClient, ApiError, Query};
pub use session::{CredentialStore, Session, TokenFile};
pub use state::auth::{AuthState, AuthStore, Status};
