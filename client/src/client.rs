//! The HTTP client: request building, execution, and response interpretation.
//!
//! # Design
//! `ApiClient` is the only place that talks to the [`Transport`]. It attaches
//! the bearer token when the session holds one, sends JSON bodies, and
//! normalizes every failure to [`ApiError`] before callers see it.
//!
//! A 401 from ANY endpoint is handled here, unconditionally: the session is
//! invalidated (both persisted keys removed, one `Invalidated` notification)
//! before the error is returned. The caller that happened to trigger it gets
//! `ApiError::Unauthorized` like any other error, but the session side effect
//! does not depend on who asked.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{self, ApiError};
use crate::http::{append_query, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::session::SessionManager;
use crate::transport::UreqTransport;

/// Typed HTTP client for the todo API. Cheap to clone; clones share the
/// transport and session manager.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: SessionManager,
}

impl ApiClient {
    /// Client over the ureq transport with the configured timeout.
    pub fn new(config: &ClientConfig, session: SessionManager) -> Self {
        Self::with_transport(
            config,
            Arc::new(UreqTransport::new(config.timeout)),
            session,
        )
    }

    /// Client over an arbitrary transport (tests use a scripted fake).
    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        session: SessionManager,
    ) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// GET `path` with the given query pairs and deserialize the body.
    pub fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.request(HttpMethod::Get, path, query, None)?;
        parse_body(&response)
    }

    /// POST a JSON payload to `path` and deserialize the body.
    pub fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = to_json(body)?;
        let response = self.request(HttpMethod::Post, path, &[], Some(body))?;
        parse_body(&response)
    }

    /// PUT a JSON payload to `path` and deserialize the body.
    pub fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = to_json(body)?;
        let response = self.request(HttpMethod::Put, path, &[], Some(body))?;
        parse_body(&response)
    }

    /// PATCH `path` with no payload and deserialize the body.
    pub fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(HttpMethod::Patch, path, &[], None)?;
        parse_body(&response)
    }

    /// DELETE `path`, discarding any response body.
    pub fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(HttpMethod::Delete, path, &[], None)?;
        Ok(())
    }

    /// Build, execute, and status-check one request. Returns the raw response
    /// for any 2xx status; all other outcomes are normalized errors.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(method, path, query, body);
        tracing::debug!(method = method.as_str(), url = %request.url, "request");

        let response = self
            .transport
            .send(&request)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        tracing::debug!(status = response.status, url = %request.url, "response");

        if response.status == 401 {
            // Global side effect, regardless of which call triggered it.
            self.session.invalidate();
            return Err(ApiError::Unauthorized {
                message: error::error_message(&response),
            });
        }
        if !(200..300).contains(&response.status) {
            return Err(error::normalize(&response));
        }
        Ok(response)
    }

    fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> HttpRequest {
        let mut url = format!("{}{path}", self.base_url);
        append_query(&mut url, query);

        let mut headers = Vec::new();
        if let Some(token) = self.session.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
