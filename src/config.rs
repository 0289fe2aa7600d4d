//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TOKEN_FILE: &str = ".conduit/token";

/// Fixed per-request timeout applied to every backend call.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Typed configuration for [`crate::net::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address of the backend API, without a trailing slash.
    pub backend_url: String,
    /// Path of the durable token file.
    pub token_file: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CONDUIT_BACKEND_URL`: API base address, default `http://localhost:3000/api`
    /// - `CONDUIT_TOKEN_FILE`: durable token file path, default `.conduit/token`
    #[must_use]
    pub fn from_env() -> Self {
        let backend_url = std::env::var("CONDUIT_BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let token_file = std::env::var("CONDUIT_TOKEN_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from);

        Self { backend_url, token_file }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
