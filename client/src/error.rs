//! Error types for the todo API client.
//!
//! # Design
//! Every failure is normalized to one shape before it reaches calling code:
//! a message, the HTTP status when one exists, and the server's per-field
//! validation errors when it sent them. `NotFound` and `Unauthorized` get
//! dedicated variants because callers distinguish them; everything else
//! non-2xx lands in `Http`.
//!
//! The message-preference chain follows the backend's conventions: the body's
//! `message` key, then its `error` key, then a generic `HTTP <status>` string.
//! Transport failures (timeout, refused connection) carry no status at all.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpResponse;

/// Per-field validation errors as sent by the server.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors surfaced by the API client and everything layered on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received: timeout, DNS failure, connection refused.
    #[error("{0}")]
    Network(String),

    /// The server returned 401. The session has already been invalidated by
    /// the time this variant is observed.
    #[error("{message}")]
    Unauthorized { message: String },

    /// The server returned 404 — the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// Any other non-2xx status, with the normalized message and whatever
    /// per-field errors the body carried.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        errors: Option<FieldErrors>,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// HTTP status associated with this error, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Per-field validation errors, when the server sent them.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Http { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }
}

/// Error body shapes the backend emits. Spring controllers answer with either
/// `{"message": ...}` or `{"error": ...}`, optionally with an `errors` map
/// keyed by field name.
#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    errors: Option<FieldErrors>,
}

/// Extract the user-facing message from an error response body, falling back
/// to a generic string when the body is empty or not JSON.
pub(crate) fn error_message(response: &HttpResponse) -> String {
    let body: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
    body.message
        .or(body.error)
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}

/// Normalize a non-2xx, non-401 response into an `ApiError`.
pub(crate) fn normalize(response: &HttpResponse) -> ApiError {
    if response.status == 404 {
        return ApiError::NotFound;
    }
    let body: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
    let message = body
        .message
        .or(body.error)
        .unwrap_or_else(|| format!("HTTP {}", response.status));
    ApiError::Http {
        status: response.status,
        message,
        errors: body.errors,
    }
}
