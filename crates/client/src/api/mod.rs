//! REST API gateway client.
//!
//! [`ApiClient`] attaches the session's bearer credential to every request,
//! refreshes an expired credential once and replays the request, and tears
//! the session down when the credential cannot be recovered.
//!
//! Resource operations are split across modules as `impl ApiClient` blocks:
//!
//! - [`auth`] - login, logout, registration, profile
//! - [`products`] - catalogue, categories, bulk stock/status updates
//! - [`customers`], [`orders`], [`inventory`], [`staff`]
//! - [`dashboard`], [`analytics`] - reporting

pub mod analytics;
pub mod auth;
pub mod client;
pub mod conversions;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod records;
pub mod staff;

pub use client::{ApiClient, ApiRequest, MultipartField, Query, RequestBody};
pub use conversions::{TranslateError, ValidationError};

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::session::StoreError;

/// Errors that can occur when talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Message extracted from the error body.
        message: String,
    },

    /// The credential was rejected and could not be refreshed. The session
    /// has been torn down; the user must log in again.
    #[error("Session expired - please log in again")]
    ReauthenticationRequired,

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Persisted session could not be read or written.
    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),

    /// Response decoded but contained invalid values.
    #[error("Invalid response data: {0}")]
    Translate(#[from] TranslateError),

    /// A request path could not be joined onto the base URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status, for errors that carry one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Understands `{"detail": ..}`, `{"error": ..}`, `{"message": ..}` and
/// field-error maps such as `{"stock": ["Not enough stock."]}`. Anything
/// else is returned as raw text.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string();
    }

    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    match &json {
        Value::Object(map) => {
            for key in ["detail", "error", "message"] {
                if let Some(text) = map.get(key).and_then(flatten_message) {
                    return text;
                }
            }
            let fields: Vec<String> = map
                .iter()
                .filter_map(|(field, value)| {
                    flatten_message(value).map(|text| {
                        if field == "non_field_errors" {
                            text
                        } else {
                            format!("{field}: {text}")
                        }
                    })
                })
                .collect();
            if fields.is_empty() {
                body.to_string()
            } else {
                fields.join("; ")
            }
        }
        other => flatten_message(other).unwrap_or_else(|| body.to_string()),
    }
}

fn flatten_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_message).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map.values().filter_map(flatten_message).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message() {
        let msg = error_message(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Given token not valid for any token type"}"#,
        );
        assert_eq!(msg, "Given token not valid for any token type");
    }

    #[test]
    fn test_error_key() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"error": "Product not found"}"#);
        assert_eq!(msg, "Product not found");
    }

    #[test]
    fn test_field_errors_are_flattened() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"price": ["Price must be greater than zero."]}"#,
        );
        assert_eq!(msg, "price: Price must be greater than zero.");

        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"non_field_errors": ["Unable to log in."]}"#,
        );
        assert_eq!(msg, "Unable to log in.");
    }

    #[test]
    fn test_raw_text_fallback() {
        let msg = error_message(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
        assert_eq!(msg, "<html>upstream down</html>");
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: "stock: Insufficient".to_string(),
        };
        assert_eq!(err.to_string(), "API error (400 Bad Request): stock: Insufficient");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!err.is_not_found());
    }
}
