//! Shared test doubles for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::types::{Role, User};

enum Script {
    /// Answer every request with the same response.
    RespondAll(HttpResponse),
    /// Answer requests in order from the queue, panicking when it runs dry.
    Sequence(Mutex<VecDeque<HttpResponse>>),
    /// Fail every request at the transport level.
    FailAll(String),
}

/// Scripted [`Transport`] that records every request it sees.
pub struct FakeTransport {
    script: Script,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn respond_all(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Script::RespondAll(HttpResponse {
                status,
                body: body.to_string(),
            }),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn sequence(responses: Vec<(u16, String)>) -> Arc<Self> {
        let queue = responses
            .into_iter()
            .map(|(status, body)| HttpResponse { status, body })
            .collect();
        Arc::new(Self {
            script: Script::Sequence(Mutex::new(queue)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_all(message: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Script::FailAll(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Everything sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Script::RespondAll(response) => Ok(response.clone()),
            Script::Sequence(queue) => Ok(queue
                .lock()
                .unwrap()
                .pop_front()
                .expect("fake transport script exhausted")),
            Script::FailAll(message) => Err(TransportError(message.clone())),
        }
    }
}

/// A plain user fixture.
pub fn user() -> User {
    User {
        id: 1,
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        first_name: None,
        last_name: None,
        role: Role::User,
        enabled: true,
        created_at: "2026-08-25T10:00:00Z".to_string(),
        updated_at: "2026-08-25T10:00:00Z".to_string(),
    }
}
