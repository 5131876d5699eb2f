//! Category endpoints.
//!
//! Deleting a category does not cascade into the todo cache client-side;
//! whatever the server does to referencing todos shows up on the next fetch.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Category, CreateCategoryRequest, UpdateCategoryRequest};

/// Typed wrapper for `/categories`.
#[derive(Clone)]
pub struct CategoryService {
    client: ApiClient,
}

impl CategoryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("/categories", &[])
    }

    pub fn get(&self, id: i64) -> Result<Category, ApiError> {
        self.client.get(&format!("/categories/{id}"), &[])
    }

    pub fn create(&self, input: &CreateCategoryRequest) -> Result<Category, ApiError> {
        self.client.post("/categories", input)
    }

    pub fn update(&self, id: i64, input: &UpdateCategoryRequest) -> Result<Category, ApiError> {
        self.client.put(&format!("/categories/{id}"), input)
    }

    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/categories/{id}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::session::SessionManager;
    use crate::testing::FakeTransport;

    fn service_with(transport: Arc<FakeTransport>) -> CategoryService {
        let config = ClientConfig::new("http://localhost:3000");
        let client = ApiClient::with_transport(&config, transport, SessionManager::in_memory());
        CategoryService::new(client)
    }

    #[test]
    fn create_posts_name_and_optional_color() {
        let transport = FakeTransport::respond_all(
            201,
            r##"{"id":1,"name":"Work","color":"#2196f3","createdAt":"x","updatedAt":"x",
                "user":{"id":1,"username":"alice"}}"##,
        );
        let service = service_with(Arc::clone(&transport));
        let category = service
            .create(&CreateCategoryRequest {
                name: "Work".to_string(),
                color: None,
            })
            .unwrap();
        assert_eq!(category.name, "Work");

        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Work");
        assert!(body.get("color").is_none());
    }

    #[test]
    fn update_puts_to_the_id_path() {
        let transport = FakeTransport::respond_all(
            200,
            r##"{"id":3,"name":"Home","color":"#4caf50","createdAt":"x","updatedAt":"x",
                "user":{"id":1,"username":"alice"}}"##,
        );
        let service = service_with(Arc::clone(&transport));
        service
            .update(
                3,
                &UpdateCategoryRequest {
                    name: Some("Home".to_string()),
                    color: None,
                },
            )
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Put);
        assert_eq!(sent[0].url, "http://localhost:3000/categories/3");
    }
}
