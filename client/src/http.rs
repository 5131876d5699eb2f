//! HTTP transport types and the execution seam.
//!
//! # Design
//! Requests and responses are plain data. The `ApiClient` builds `HttpRequest`
//! values and interprets `HttpResponse` values; the actual round-trip happens
//! behind the [`Transport`] trait so unit tests can substitute a scripted fake
//! while production code uses the ureq-backed transport.
//!
//! All fields use owned types (`String`, `Vec`) so values can be cloned into
//! request logs and test assertions without lifetime concerns.

use thiserror::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data, ready to be executed by a
/// [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Failure to complete a round-trip: timeout, DNS, connection refused.
/// The server never produced a status code.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Executes an `HttpRequest` against the network (or a test double).
///
/// Implementations must return `Ok` for any response the server produced,
/// whatever its status code; `Err` is reserved for transport-level failure.
/// A single attempt per call — retries are the caller's decision.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Percent-encode a query component (RFC 3986 unreserved characters pass
/// through, everything else is escaped).
pub(crate) fn encode_query_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}

/// Append `query` pairs to `url`, encoding values. No-op for an empty list.
pub(crate) fn append_query(url: &mut String, query: &[(&str, String)]) {
    for (i, (key, value)) in query.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(&encode_query_component(value));
    }
}
