//! Authentication endpoints.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{LoginRequest, LoginResponse, RegisterRequest, User};

/// Typed wrapper for `/auth/*`.
///
/// `login`/`register` are the only calls that go out without a bearer token;
/// the `sign_in`/`sign_out` conveniences additionally keep the session
/// manager in step with the server's answer.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client.post("/auth/login", credentials)
    }

    pub fn register(&self, input: &RegisterRequest) -> Result<User, ApiError> {
        self.client.post("/auth/register", input)
    }

    /// Profile of the authenticated user.
    pub fn current_user(&self) -> Result<User, ApiError> {
        self.client.get("/auth/me", &[])
    }

    /// Log in and establish the session from the response.
    pub fn sign_in(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self.login(credentials)?;
        self.client.session().establish(&response.token, &response.user);
        Ok(response)
    }

    /// Drop the session. Purely client-side; the token simply stops being
    /// attached to subsequent requests.
    pub fn sign_out(&self) {
        self.client.session().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::session::SessionManager;
    use crate::testing::{user, FakeTransport};

    fn login_response_json() -> String {
        format!(
            r#"{{"token":"tok-1","type":"Bearer","expiresAt":"2026-08-26T10:00:00Z","user":{}}}"#,
            serde_json::to_string(&user()).unwrap()
        )
    }

    fn service_with(transport: Arc<FakeTransport>) -> AuthService {
        let config = ClientConfig::new("http://localhost:3000");
        let client = ApiClient::with_transport(&config, transport, SessionManager::in_memory());
        AuthService::new(client)
    }

    #[test]
    fn login_posts_credentials() {
        let transport = FakeTransport::respond_all(200, &login_response_json());
        let service = service_with(Arc::clone(&transport));

        let credentials = LoginRequest {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        let response = service.login(&credentials).unwrap();
        assert_eq!(response.token, "tok-1");

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].url, "http://localhost:3000/auth/login");
        let body: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["password"], "secret");
    }

    #[test]
    fn sign_in_establishes_the_session() {
        let transport = FakeTransport::respond_all(200, &login_response_json());
        let service = service_with(transport);
        let session = service.client.session().clone();

        service
            .sign_in(&LoginRequest {
                username: "alice".to_string(),
                password: "secret".to_string(),
            })
            .unwrap();
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(session.user().unwrap().username, "alice");
    }

    #[test]
    fn failed_sign_in_leaves_session_empty() {
        let transport =
            FakeTransport::respond_all(400, r#"{"message":"Invalid username or password"}"#);
        let service = service_with(transport);
        let session = service.client.session().clone();

        let err = service
            .sign_in(&LoginRequest {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn register_omits_absent_name_fields() {
        let transport = FakeTransport::respond_all(201, &serde_json::to_string(&user()).unwrap());
        let service = service_with(Arc::clone(&transport));

        service
            .register(&RegisterRequest {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
                first_name: None,
                last_name: None,
            })
            .unwrap();
        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert!(body.get("firstName").is_none());
        assert!(body.get("lastName").is_none());
    }

    #[test]
    fn sign_out_clears_the_session() {
        let transport = FakeTransport::respond_all(200, &login_response_json());
        let service = service_with(transport);
        let session = service.client.session().clone();
        session.establish("tok-1", &user());

        service.sign_out();
        assert!(!session.is_authenticated());
    }
}
