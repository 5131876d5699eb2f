//! In-memory implementation of the todo backend, used as a test double by the
//! client's integration tests and runnable standalone.
//!
//! # Design
//! One `Arc<RwLock<Db>>` holds everything; ids are sequential. Register/login
//! are public, every other route sits behind a bearer-token middleware that
//! resolves the caller and answers 401 for missing or unknown tokens. Wire
//! types are defined here independently of the client crate so integration
//! tests catch schema drift between the two.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Extension, Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

// --- wire types ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
    pub user: UserRef,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: String,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub category: Option<Category>,
    pub user: UserRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub category_id: Option<i64>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub completed: Option<bool>,
}

// --- state ---

struct UserRecord {
    user: User,
    password: String,
}

#[derive(Default)]
struct Db {
    users: HashMap<i64, UserRecord>,
    tokens: HashMap<String, i64>,
    todos: HashMap<i64, Todo>,
    categories: HashMap<i64, Category>,
    last_id: i64,
}

impl Db {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

pub type AppState = Arc<RwLock<Db>>;

/// Authenticated caller, inserted by the auth middleware.
#[derive(Clone)]
struct CurrentUser(UserRef);

enum ApiFailure {
    NotFound,
    Message(StatusCode, String),
}

impl ApiFailure {
    fn bad_request(message: &str) -> Self {
        ApiFailure::Message(StatusCode::BAD_REQUEST, message.to_string())
    }

    fn unauthorized() -> Self {
        ApiFailure::Message(StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            ApiFailure::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiFailure::Message(status, message) => {
                (status, Json(json!({ "message": message }))).into_response()
            }
        }
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn is_past(timestamp: &str) -> bool {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Utc) < Utc::now())
        .unwrap_or(false)
}

fn is_today(timestamp: &str) -> bool {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Utc).date_naive() == Utc::now().date_naive())
        .unwrap_or(false)
}

// --- router ---

pub fn app() -> Router {
    let state: AppState = Arc::new(RwLock::new(Db::default()));

    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/stats", get(todo_stats))
        .route("/todos/due-today", get(todos_due_today))
        .route("/todos/overdue", get(todos_overdue))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/todos/{id}/toggle", patch(toggle_todo))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiFailure> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or_else(ApiFailure::unauthorized)?;

    let caller = {
        let db = state.read().await;
        let user_id = *db.tokens.get(&token).ok_or_else(ApiFailure::unauthorized)?;
        let record = db.users.get(&user_id).ok_or_else(ApiFailure::unauthorized)?;
        UserRef {
            id: record.user.id,
            username: record.user.username.clone(),
        }
    };

    request.extensions_mut().insert(CurrentUser(caller));
    Ok(next.run(request).await)
}

// --- auth handlers ---

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<User>), ApiFailure> {
    if input.username.trim().is_empty() {
        return Err(ApiFailure::bad_request("Username is required"));
    }
    let mut db = state.write().await;
    if db
        .users
        .values()
        .any(|record| record.user.username == input.username)
    {
        return Err(ApiFailure::bad_request("Username is already taken"));
    }
    let now = now_iso();
    let id = db.next_id();
    let user = User {
        id,
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        role: "USER".to_string(),
        enabled: true,
        created_at: now.clone(),
        updated_at: now,
    };
    db.users.insert(
        id,
        UserRecord {
            user: user.clone(),
            password: input.password,
        },
    );
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let mut db = state.write().await;
    let user = db
        .users
        .values()
        .find(|record| record.user.username == input.username && record.password == input.password)
        .map(|record| record.user.clone())
        .ok_or_else(|| ApiFailure::bad_request("Invalid username or password"))?;

    let token = format!("mock-token-{}-{}", user.id, db.tokens.len() + 1);
    db.tokens.insert(token.clone(), user.id);
    let expires_at = (Utc::now() + chrono::Duration::hours(24))
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "user": user,
        "expiresAt": expires_at,
    })))
}

async fn me(Extension(CurrentUser(caller)): Extension<CurrentUser>, State(state): State<AppState>)
    -> Result<Json<User>, ApiFailure> {
    let db = state.read().await;
    let record = db.users.get(&caller.id).ok_or(ApiFailure::NotFound)?;
    Ok(Json(record.user.clone()))
}

// --- todo handlers ---

async fn list_todos(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
    State(state): State<AppState>,
) -> Json<Vec<Todo>> {
    let db = state.read().await;
    let mut todos: Vec<Todo> = db
        .todos
        .values()
        .filter(|todo| todo.user.id == caller.id)
        .filter(|todo| match params.search.as_deref() {
            // Search takes precedence over the completed filter, matching
            // the real backend's controller.
            Some(search) if !search.trim().is_empty() => {
                let needle = search.trim().to_lowercase();
                todo.title.to_lowercase().contains(&needle)
                    || todo
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            _ => params
                .completed
                .is_none_or(|completed| todo.completed == completed),
        })
        .cloned()
        .collect();
    // Newest first, as the backend orders by creation time descending.
    todos.sort_by(|a, b| b.id.cmp(&a.id));
    Json(todos)
}

async fn create_todo(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(input): Json<CreateTodoInput>,
) -> Result<(StatusCode, Json<Todo>), ApiFailure> {
    if input.title.trim().is_empty() {
        return Err(ApiFailure::bad_request("Title is required"));
    }
    let mut db = state.write().await;
    let category = match input.category_id {
        Some(category_id) => Some(
            db.categories
                .get(&category_id)
                .filter(|category| category.user.id == caller.id)
                .cloned()
                .ok_or(ApiFailure::NotFound)?,
        ),
        None => None,
    };
    let now = now_iso();
    let id = db.next_id();
    let todo = Todo {
        id,
        title: input.title,
        description: input.description,
        completed: false,
        priority: input.priority.unwrap_or_else(|| "MEDIUM".to_string()),
        due_date: input.due_date,
        completed_at: None,
        created_at: now.clone(),
        updated_at: now,
        category,
        user: caller,
    };
    db.todos.insert(id, todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Todo>, ApiFailure> {
    let db = state.read().await;
    db.todos
        .get(&id)
        .filter(|todo| todo.user.id == caller.id)
        .cloned()
        .map(Json)
        .ok_or(ApiFailure::NotFound)
}

async fn update_todo(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(input): Json<UpdateTodoInput>,
) -> Result<Json<Todo>, ApiFailure> {
    let mut db = state.write().await;
    let category = match input.category_id {
        Some(category_id) => Some(
            db.categories
                .get(&category_id)
                .filter(|category| category.user.id == caller.id)
                .cloned()
                .ok_or(ApiFailure::NotFound)?,
        ),
        None => None,
    };
    let todo = db
        .todos
        .get_mut(&id)
        .filter(|todo| todo.user.id == caller.id)
        .ok_or(ApiFailure::NotFound)?;
    if let Some(title) = input.title {
        if title.trim().is_empty() {
            return Err(ApiFailure::bad_request("Title is required"));
        }
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = Some(description);
    }
    if let Some(priority) = input.priority {
        todo.priority = priority;
    }
    if let Some(due_date) = input.due_date {
        todo.due_date = Some(due_date);
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
        todo.completed_at = completed.then(now_iso);
    }
    if category.is_some() {
        todo.category = category;
    }
    todo.updated_at = now_iso();
    Ok(Json(todo.clone()))
}

async fn toggle_todo(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Todo>, ApiFailure> {
    let mut db = state.write().await;
    let todo = db
        .todos
        .get_mut(&id)
        .filter(|todo| todo.user.id == caller.id)
        .ok_or(ApiFailure::NotFound)?;
    todo.completed = !todo.completed;
    todo.completed_at = todo.completed.then(now_iso);
    todo.updated_at = now_iso();
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiFailure> {
    let mut db = state.write().await;
    let owned = db
        .todos
        .get(&id)
        .is_some_and(|todo| todo.user.id == caller.id);
    if !owned {
        return Err(ApiFailure::NotFound);
    }
    db.todos.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn todo_stats(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    let db = state.read().await;
    let todos: Vec<&Todo> = db
        .todos
        .values()
        .filter(|todo| todo.user.id == caller.id)
        .collect();
    let total = todos.len();
    let completed = todos.iter().filter(|todo| todo.completed).count();
    let overdue = todos
        .iter()
        .filter(|todo| !todo.completed && todo.due_date.as_deref().is_some_and(is_past))
        .count();
    Json(json!({
        "total": total,
        "completed": completed,
        "pending": total - completed,
        "overdue": overdue,
    }))
}

async fn todos_due_today(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Json<Vec<Todo>> {
    let db = state.read().await;
    let todos = db
        .todos
        .values()
        .filter(|todo| todo.user.id == caller.id)
        .filter(|todo| todo.due_date.as_deref().is_some_and(is_today))
        .cloned()
        .collect();
    Json(todos)
}

async fn todos_overdue(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Json<Vec<Todo>> {
    let db = state.read().await;
    let todos = db
        .todos
        .values()
        .filter(|todo| todo.user.id == caller.id)
        .filter(|todo| !todo.completed && todo.due_date.as_deref().is_some_and(is_past))
        .cloned()
        .collect();
    Json(todos)
}

// --- category handlers ---

async fn list_categories(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Json<Vec<Category>> {
    let db = state.read().await;
    let mut categories: Vec<Category> = db
        .categories
        .values()
        .filter(|category| category.user.id == caller.id)
        .cloned()
        .collect();
    categories.sort_by_key(|category| category.id);
    Json(categories)
}

async fn create_category(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiFailure> {
    if input.name.trim().is_empty() {
        return Err(ApiFailure::bad_request("Name is required"));
    }
    let mut db = state.write().await;
    let now = now_iso();
    let id = db.next_id();
    let category = Category {
        id,
        name: input.name,
        color: input.color.unwrap_or_else(|| "#2196f3".to_string()),
        created_at: now.clone(),
        updated_at: now,
        user: caller,
    };
    db.categories.insert(id, category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_category(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Category>, ApiFailure> {
    let db = state.read().await;
    db.categories
        .get(&id)
        .filter(|category| category.user.id == caller.id)
        .cloned()
        .map(Json)
        .ok_or(ApiFailure::NotFound)
}

async fn update_category(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<Category>, ApiFailure> {
    let mut db = state.write().await;
    let category = db
        .categories
        .get_mut(&id)
        .filter(|category| category.user.id == caller.id)
        .ok_or(ApiFailure::NotFound)?;
    if let Some(name) = input.name {
        category.name = name;
    }
    if let Some(color) = input.color {
        category.color = color;
    }
    category.updated_at = now_iso();
    Ok(Json(category.clone()))
}

async fn delete_category(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiFailure> {
    let mut db = state.write().await;
    let owned = db
        .categories
        .get(&id)
        .is_some_and(|category| category.user.id == caller.id);
    if !owned {
        return Err(ApiFailure::NotFound);
    }
    db.categories.remove(&id);
    // Todos keep their embedded category snapshot; the real backend decides
    // cascade semantics.
    Ok(StatusCode::NO_CONTENT)
}
