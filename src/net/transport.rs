//! HTTP transport for the Conduit backend.
//!
//! DESIGN
//! ======
//! One configured `reqwest::Client` sits behind every resource call. The
//! transport owns base-address resolution, credential injection, query
//! serialization, envelope parsing, and error normalization; callers see
//! typed bodies or [`ApiError`], never status codes or raw responses.
//!
//! Two header mechanisms coexist deliberately: the mutable default map is
//! written by the credential store, and the per-request injection reads the
//! session immediately before transmission. A set token wins through the
//! per-request path; a cleared credential leaves an explicitly empty
//! default `Authorization` header behind.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, REQUEST_TIMEOUT_SECS};
use crate::net::error::{self, ApiError};
use crate::net::query::Query;
use crate::session::Session;

/// Shared HTTP layer for all resource clients.
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
    default_headers: RwLock<HeaderMap>,
}

impl Transport {
    /// Build the transport for `config`, reading credentials from `session`.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|err| ApiError::unknown(format!("HTTP client build failed: {err}")))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            session,
            default_headers: RwLock::new(default_headers),
        })
    }

    /// Overwrite the default `Authorization` header.
    ///
    /// `None` sets the header to the empty string rather than removing it.
    pub(crate) fn set_default_authorization(&self, token: Option<&str>) {
        let value = match token {
            Some(token) => authorization_value(token),
            None => Some(HeaderValue::from_static("")),
        };
        if let Some(value) = value {
            self.default_headers
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(AUTHORIZATION, value);
        }
    }

    /// GET `path`, translating pagination before serialization.
    ///
    /// # Errors
    ///
    /// Fails with the normalized [`ApiError`] for any failure class.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T, ApiError> {
        let query = query.paginate();
        let mut builder = self.request(Method::GET, path);
        if !query.is_empty() {
            builder = builder.query(&query.to_pairs());
        }
        self.send(builder).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// POST `path` with no payload.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// DELETE `path`, parsing the response body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    /// DELETE `path`, discarding whatever body the backend returns.
    pub async fn delete_no_content(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Assemble a request with the default headers and, when a credential
    /// is set, the `Authorization` header injected immediately before
    /// transmission.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut headers = self
            .default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(token) = self.session.token() {
            if let Some(value) = authorization_value(&token) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        self.http.request(method, format!("{}{path}", self.base_url)).headers(headers)
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let body = self.dispatch(builder).await?;
        serde_json::from_slice(&body).map_err(|err| ApiError::unknown(err.to_string()))
    }

    /// Execute the request and return the raw success body.
    async fn dispatch(&self, builder: reqwest::RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = builder.send().await.map_err(|err| {
            tracing::debug!(error = %err, "request failed before a response arrived");
            error::from_transport(&err)
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| error::from_transport(&err))?;

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            tracing::debug!(status = status.as_u16(), "backend rejected request");
            Err(error::from_status_body(status, &body))
        }
    }
}

fn authorization_value(token: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(&format!("Token {token}")) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("credential contains characters not valid in a header; skipping injection");
            None
        }
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
