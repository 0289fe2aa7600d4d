//! Error normalization for backend calls.
//!
//! DESIGN
//! ======
//! Every failure a request can hit collapses into one wire-compatible
//! shape: a map of field names to ordered message lists. Callers branch on
//! field names inside the map, never on an error class. Three classes feed
//! it: the backend's own validation body (propagated verbatim), connectivity
//! failures (synthesized), and everything else (synthesized with the
//! underlying message).

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Field key used for synthesized connectivity failures.
pub const NETWORK_ERROR_KEY: &str = "Network Error";

/// Message attached under [`NETWORK_ERROR_KEY`].
pub const NETWORK_ERROR_MESSAGE: &str = "Please check your network connection";

/// Field key used for synthesized unclassified failures.
pub const UNKNOWN_ERROR_KEY: &str = "Unknown Error";

/// Normalized error surfaced by every transport and resource call.
///
/// Matches the backend's validation envelope (`{"errors": {field:
/// [messages]}}`). Connectivity and unclassified failures are synthesized
/// into the same shape, so consumers render one structure regardless of
/// where the failure originated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("request failed: {}", summarize(.errors))]
pub struct ApiError {
    /// Field name to ordered failure messages.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    /// Error with a single field and message.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.into(), vec![message.into()]);
        Self { errors }
    }

    /// Synthesized error for requests that got no response.
    #[must_use]
    pub fn network() -> Self {
        Self::single(NETWORK_ERROR_KEY, NETWORK_ERROR_MESSAGE)
    }

    /// Synthesized error for failures outside the other classes.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::single(UNKNOWN_ERROR_KEY, message)
    }
}

fn summarize(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field} {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a failure from the HTTP layer into the normalized shape.
///
/// Timeouts and connection failures count as "no response arrived"; request
/// construction and body handling failures are unclassified.
pub(crate) fn from_transport(err: &reqwest::Error) -> ApiError {
    if err.is_builder() || err.is_decode() {
        ApiError::unknown(err.to_string())
    } else if err.is_timeout() || err.is_connect() || err.is_request() {
        ApiError::network()
    } else {
        ApiError::unknown(err.to_string())
    }
}

/// Interpret a non-success response body.
///
/// The backend reports failures in the normalized shape already; a body
/// that does not parse as one becomes an unclassified error carrying the
/// status.
pub(crate) fn from_status_body(status: StatusCode, body: &[u8]) -> ApiError {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| ApiError::unknown(format!("unexpected error body (status {status})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_shape() {
        let err = ApiError::network();
        assert_eq!(
            err.errors.get(NETWORK_ERROR_KEY),
            Some(&vec![NETWORK_ERROR_MESSAGE.to_string()])
        );
    }

    #[test]
    fn unknown_error_carries_message() {
        let err = ApiError::unknown("boom");
        assert_eq!(err.errors.get(UNKNOWN_ERROR_KEY), Some(&vec!["boom".to_string()]));
    }

    #[test]
    fn status_body_parses_validation_envelope_verbatim() {
        let body = br#"{"errors":{"email":["is invalid"],"password":["is too short","is weak"]}}"#;
        let err = from_status_body(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.errors.get("email"), Some(&vec!["is invalid".to_string()]));
        assert_eq!(
            err.errors.get("password"),
            Some(&vec!["is too short".to_string(), "is weak".to_string()])
        );
    }

    #[test]
    fn status_body_falls_back_on_unparseable_body() {
        let err = from_status_body(StatusCode::BAD_GATEWAY, b"<html>nope</html>");
        let messages = err.errors.get(UNKNOWN_ERROR_KEY).unwrap();
        assert!(messages[0].contains("502"));
    }

    #[test]
    fn display_joins_fields_and_messages() {
        let err = ApiError::single("email", "is invalid");
        assert_eq!(err.to_string(), "request failed: email is invalid");
    }
}
