//! Todo endpoints.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{CreateTodoRequest, Todo, TodoFilters, TodoStats, UpdateTodoRequest};

/// Typed wrapper for `/todos`.
#[derive(Clone)]
pub struct TodoService {
    client: ApiClient,
}

impl TodoService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List todos with server-side filtering. Empty filters list everything.
    pub fn list(&self, filters: &TodoFilters) -> Result<Vec<Todo>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(search) = &filters.search {
            query.push(("search", search.clone()));
        }
        if let Some(completed) = filters.completed {
            query.push(("completed", completed.to_string()));
        }
        self.client.get("/todos", &query)
    }

    pub fn get(&self, id: i64) -> Result<Todo, ApiError> {
        self.client.get(&format!("/todos/{id}"), &[])
    }

    pub fn create(&self, input: &CreateTodoRequest) -> Result<Todo, ApiError> {
        self.client.post("/todos", input)
    }

    pub fn update(&self, id: i64, input: &UpdateTodoRequest) -> Result<Todo, ApiError> {
        self.client.put(&format!("/todos/{id}"), input)
    }

    /// Flip completion state. The returned todo is the server's authoritative
    /// version, including server-computed fields such as `completedAt`.
    pub fn toggle(&self, id: i64) -> Result<Todo, ApiError> {
        self.client.patch(&format!("/todos/{id}/toggle"))
    }

    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/todos/{id}"))
    }

    /// Dashboard counters, aggregated server-side.
    pub fn stats(&self) -> Result<TodoStats, ApiError> {
        self.client.get("/todos/stats", &[])
    }

    pub fn due_today(&self) -> Result<Vec<Todo>, ApiError> {
        self.client.get("/todos/due-today", &[])
    }

    pub fn overdue(&self) -> Result<Vec<Todo>, ApiError> {
        self.client.get("/todos/overdue", &[])
    }
}
