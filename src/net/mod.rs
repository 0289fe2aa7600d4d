//! Backend access: transport, resource clients, and the [`ApiClient`] facade.
//!
//! DESIGN
//! ======
//! `Transport` centralizes everything every call needs (credentials, query
//! serialization, error normalization); the resource groups in [`api`] stay
//! thin path-and-verb builders. `ApiClient` assembles the groups around one
//! shared transport and session.

pub mod api;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

use std::sync::Arc;

pub use api::{Articles, Auth, Comments, Profiles, Tags};
pub use error::ApiError;
pub use query::Query;
pub use transport::Transport;

use crate::config::ClientConfig;
use crate::session::{CredentialStore, Session, TokenFile};

/// One configured handle to the backend: resource groups plus credential
/// control, sharing a single transport and session.
pub struct ApiClient {
    pub auth: Auth,
    pub tags: Tags,
    pub articles: Articles,
    pub comments: Comments,
    pub profiles: Profiles,
    credentials: CredentialStore,
    session: Arc<Session>,
}

impl ApiClient {
    /// Build a client from environment variables (see
    /// [`ClientConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::from_env())
    }

    /// Build a client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let session = Arc::new(Session::new());
        let transport = Arc::new(Transport::new(&config, Arc::clone(&session))?);
        let credentials = CredentialStore::new(
            Arc::clone(&session),
            Arc::clone(&transport),
            TokenFile::new(config.token_file),
        );

        Ok(Self {
            auth: Auth::new(Arc::clone(&transport)),
            tags: Tags::new(Arc::clone(&transport)),
            articles: Articles::new(Arc::clone(&transport)),
            comments: Comments::new(Arc::clone(&transport)),
            profiles: Profiles::new(transport),
            credentials,
            session,
        })
    }

    /// Credential writer for this client.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Shared session handle.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}
