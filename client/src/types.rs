//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the backend's JSON schema (camelCase field names) but
//! are defined independently from the mock-server crate. Integration tests
//! catch any schema drift between the two. Timestamps are ISO-8601 strings
//! passed through opaquely — this layer never does date arithmetic.
//!
//! Update payloads serialize only the fields that are present; omitted fields
//! remain unchanged on the server.

use serde::{Deserialize, Serialize};

/// Todo priority as defined by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Sort rank, ascending with urgency.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    /// Display color associated with the priority.
    pub fn color(self) -> &'static str {
        match self {
            Priority::Low => "#4caf50",
            Priority::Medium => "#ff9800",
            Priority::High => "#f44336",
            Priority::Urgent => "#9c27b0",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Sort todos most-urgent-first, preserving order within equal priorities.
pub fn sort_by_priority(todos: &mut [Todo]) {
    todos.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
}

/// Owner reference embedded in todos and categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

/// A registered user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: Role,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// A category as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
    pub user: UserRef,
    #[serde(default)]
    pub todo_count: Option<i64>,
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub category: Option<Category>,
    pub user: UserRef,
}

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload: bearer token plus the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub user: User,
    pub expires_at: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Payload for `POST /todos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Payload for `PUT /todos/{id}`. Only the fields present in the JSON are
/// applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Server-side filters for `GET /todos`. Empty filters list everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilters {
    pub search: Option<String>,
    pub completed: Option<bool>,
}

/// Aggregated counters for the dashboard, computed server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub overdue: u64,
}

/// Payload for `POST /categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload for `PUT /categories/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_deserializes_from_backend_json() {
        let json = r#"{
            "id": 5,
            "title": "Buy milk",
            "description": null,
            "completed": false,
            "priority": "HIGH",
            "dueDate": "2026-09-01T00:00:00Z",
            "createdAt": "2026-08-25T10:00:00Z",
            "updatedAt": "2026-08-25T10:00:00Z",
            "user": {"id": 1, "username": "alice"}
        }"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.id, 5);
        assert_eq!(todo.priority, Priority::High);
        assert!(todo.completed_at.is_none());
        assert!(todo.category.is_none());
        assert_eq!(todo.user.username, "alice");
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let input = UpdateTodoRequest {
            title: Some("Updated".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["title"], "Updated");
        assert!(json.get("completed").is_none());
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn create_request_uses_camel_case_keys() {
        let input = CreateTodoRequest {
            title: "New".to_string(),
            due_date: Some("2026-09-01T00:00:00Z".to_string()),
            category_id: Some(3),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["dueDate"], "2026-09-01T00:00:00Z");
        assert_eq!(json["categoryId"], 3);
    }

    #[test]
    fn priority_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"URGENT\"");
        let p: Priority = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn login_response_maps_type_field() {
        let json = r#"{
            "token": "abc",
            "type": "Bearer",
            "expiresAt": "2026-08-26T10:00:00Z",
            "user": {
                "id": 1, "username": "alice", "email": "a@example.com",
                "role": "USER", "enabled": true,
                "createdAt": "2026-08-25T10:00:00Z", "updatedAt": "2026-08-25T10:00:00Z"
            }
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.user.role, Role::User);
    }

    #[test]
    fn sort_by_priority_is_urgent_first_and_stable() {
        fn todo(id: i64, priority: Priority) -> Todo {
            Todo {
                id,
                title: format!("t{id}"),
                description: None,
                completed: false,
                priority,
                due_date: None,
                completed_at: None,
                created_at: String::new(),
                updated_at: String::new(),
                category: None,
                user: UserRef {
                    id: 1,
                    username: "alice".to_string(),
                },
            }
        }
        let mut todos = vec![
            todo(1, Priority::Low),
            todo(2, Priority::Urgent),
            todo(3, Priority::Medium),
            todo(4, Priority::Urgent),
        ];
        sort_by_priority(&mut todos);
        let ids: Vec<i64> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }
}
