//! Local todo-list cache and its reconciliation rules.
//!
//! # Design
//! [`TodoListController`] owns the cached list, the search text, and the
//! status filter. Fetching replaces the whole cache with the server's
//! filtered result; mutations reconcile the server-confirmed todo into the
//! cache without re-fetching:
//!
//! - create prepends,
//! - update and toggle replace by id (toggle uses the server's version so
//!   server-computed fields like `completedAt` stay consistent),
//! - delete removes by id, and an id absent from the cache is a no-op.
//!
//! Filtering is strictly server-side; the cache is never re-filtered
//! locally. Success is taken to mean cache and server agree — there is no
//! background reconciliation to correct drift from concurrent external
//! mutation.

use crate::error::ApiError;
use crate::services::TodoService;
use crate::tracker::{AsyncState, Tracker};
use crate::types::{CreateTodoRequest, Todo, TodoFilters, UpdateTodoRequest};

/// Completion filter applied server-side on fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    /// The `completed` query value this filter maps to.
    pub fn completed(self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(false),
            StatusFilter::Completed => Some(true),
        }
    }
}

/// Drives [`TodoService`] and reconciles outcomes into a local cache.
pub struct TodoListController {
    service: TodoService,
    todos: Vec<Todo>,
    search: String,
    filter: StatusFilter,
    fetch: Tracker<Vec<Todo>>,
    toggle: Tracker<Todo>,
    removal: Tracker<i64>,
}

impl TodoListController {
    pub fn new(service: TodoService) -> Self {
        Self {
            service,
            todos: Vec::new(),
            search: String::new(),
            filter: StatusFilter::All,
            fetch: Tracker::new(),
            toggle: Tracker::new(),
            removal: Tracker::new(),
        }
    }

    /// The cached list, in server order with local reconciliations applied.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Observable state of the most recent fetch.
    pub fn fetch_state(&self) -> AsyncState<Vec<Todo>> {
        self.fetch.state()
    }

    /// Fetch with the current criteria and replace the entire cache.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        let filters = self.filters();
        let service = &self.service;
        let fetched = self.fetch.execute(|| service.list(&filters))?;
        self.todos = fetched;
        Ok(())
    }

    /// Update the search text; triggers exactly one fetch.
    pub fn set_search(&mut self, search: impl Into<String>) -> Result<(), ApiError> {
        self.search = search.into();
        self.refresh()
    }

    /// Update the status filter; triggers exactly one fetch.
    pub fn set_filter(&mut self, filter: StatusFilter) -> Result<(), ApiError> {
        self.filter = filter;
        self.refresh()
    }

    /// Create on the server, then prepend the confirmed todo. Existing
    /// entries keep their identity and order; no re-fetch.
    pub fn create(&mut self, input: &CreateTodoRequest) -> Result<Todo, ApiError> {
        let todo = self.service.create(input)?;
        self.todos.insert(0, todo.clone());
        Ok(todo)
    }

    /// Update on the server, then replace the matching cache entry in place.
    pub fn update(&mut self, id: i64, input: &UpdateTodoRequest) -> Result<Todo, ApiError> {
        let todo = self.service.update(id, input)?;
        replace_by_id(&mut self.todos, &todo);
        Ok(todo)
    }

    /// Toggle on the server, then adopt the server's authoritative version.
    pub fn toggle(&mut self, id: i64) -> Result<Todo, ApiError> {
        let service = &self.service;
        let todo = self.toggle.execute(|| service.toggle(id))?;
        replace_by_id(&mut self.todos, &todo);
        Ok(todo)
    }

    /// Delete on the server, gated on explicit caller confirmation.
    ///
    /// Unconfirmed calls never reach the server and return `Ok(false)`. On
    /// confirmed success exactly the matching entry is removed; an id that is
    /// not cached leaves the cache untouched.
    pub fn delete(&mut self, id: i64, confirmed: bool) -> Result<bool, ApiError> {
        if !confirmed {
            return Ok(false);
        }
        let service = &self.service;
        self.removal.execute(|| {
            service.delete(id)?;
            Ok(id)
        })?;
        remove_by_id(&mut self.todos, id);
        Ok(true)
    }

    pub fn pending_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }

    fn filters(&self) -> TodoFilters {
        let search = self.search.trim();
        TodoFilters {
            search: (!search.is_empty()).then(|| search.to_string()),
            completed: self.filter.completed(),
        }
    }
}

/// Replace the entry with `updated.id` in place; entries with other ids keep
/// their identity and order. No-op when the id is not present.
fn replace_by_id(todos: &mut [Todo], updated: &Todo) {
    if let Some(slot) = todos.iter_mut().find(|todo| todo.id == updated.id) {
        *slot = updated.clone();
    }
}

/// Remove the entry with `id`. No-op when the id is not present.
fn remove_by_id(todos: &mut Vec<Todo>, id: i64) {
    todos.retain(|todo| todo.id != id);
}
